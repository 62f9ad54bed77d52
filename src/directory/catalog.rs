use serde::Serialize;

/// Trades offered in the filter panel and the signup form.
pub const TRADES: [&str; 30] = [
    "Technicien HVAC",
    "Électricien Bâtiment",
    "Plombier Sanitaire",
    "Charpentier Bois",
    "Soudeur TIG/MIG",
    "Mécanicien Auto",
    "Ouvrier BTP",
    "Peintre Bâtiment",
    "Maçon VRD",
    "Conducteur Engins TP",
    "Couvreur Zingueur",
    "Vitrier Poseur",
    "Plaquiste",
    "Carreleur Mosaïste",
    "Poseur Sols",
    "Tôlier Carrossier",
    "Chaudronnier Industriel",
    "Serrurier Métallier",
    "Installateur PV",
    "Réparateur Électroménager",
    "Technicien Éolien",
    "Frigoriste",
    "Ascensoriste",
    "Opérateur CNC",
    "Installateur Fibre",
    "Agent Maintenance Multi",
    "Conducteur SPL",
    "Grutier Mobile",
    "Monteur Échafaudage",
    "Électromécanicien",
];

/// The 24 governorates a worker can be based in.
pub const LOCATIONS: [&str; 24] = [
    "Tunis",
    "Ariana",
    "Ben Arous",
    "Manouba",
    "Nabeul",
    "Zaghouan",
    "Bizerte",
    "Béja",
    "Jendouba",
    "Le Kef",
    "Siliana",
    "Sousse",
    "Monastir",
    "Mahdia",
    "Kairouan",
    "Kasserine",
    "Sidi Bouzid",
    "Sfax",
    "Gabès",
    "Médenine",
    "Tataouine",
    "Gafsa",
    "Tozeur",
    "Kebili",
];

#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub trades: &'static [&'static str],
    pub locations: &'static [&'static str],
}

pub fn catalog() -> Catalog {
    Catalog {
        trades: &TRADES,
        locations: &LOCATIONS,
    }
}
