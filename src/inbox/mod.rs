//! Conversation reduction for the inbox.
//!
//! The database hands back flat message rows; everything here turns them
//! into per-counterpart views without further queries.

use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::models::messages::{self, ConversationSummary, Counterpart};
use crate::models::profiles;

/// Distinct counterparts of `user_id`, in first-seen order.
pub fn counterparts(user_id: Uuid, messages: &[messages::Model]) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    messages
        .iter()
        .map(|m| m.counterpart_of(user_id))
        .filter(|id| seen.insert(*id))
        .collect()
}

/// One summary per counterpart carrying the latest message, newest
/// conversation first.
///
/// Counterparts without a profile row still get an entry with no name.
pub fn build_conversations(
    user_id: Uuid,
    messages: &[messages::Model],
    profiles: &HashMap<Uuid, profiles::Model>,
    unread: &HashMap<Uuid, u64>,
) -> Vec<ConversationSummary> {
    let mut latest: HashMap<Uuid, &messages::Model> = HashMap::new();
    for message in messages {
        let other = message.counterpart_of(user_id);
        latest
            .entry(other)
            .and_modify(|cur| {
                if message.created_at > cur.created_at {
                    *cur = message;
                }
            })
            .or_insert(message);
    }

    let mut summaries: Vec<ConversationSummary> = latest
        .into_iter()
        .map(|(other, message)| ConversationSummary {
            counterpart: counterpart(other, profiles.get(&other)),
            last_message: message.content.clone(),
            last_message_at: message.created_at,
            unread_count: unread.get(&other).copied().unwrap_or(0),
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.last_message_at
            .cmp(&a.last_message_at)
            .then_with(|| a.counterpart.user_id.cmp(&b.counterpart.user_id))
    });
    summaries
}

pub fn counterpart(user_id: Uuid, profile: Option<&profiles::Model>) -> Counterpart {
    profile.map(Counterpart::from).unwrap_or(Counterpart {
        user_id,
        name: None,
        profile_picture: None,
    })
}

/// Ids of the unread messages in `thread` that were sent to `reader_id`.
pub fn unread_addressed_to(reader_id: Uuid, thread: &[messages::Model]) -> Vec<Uuid> {
    thread
        .iter()
        .filter(|m| m.receiver_id == reader_id && !m.is_read)
        .map(|m| m.id)
        .collect()
}
