//! Saudi Arabian regions and the cities served within each.
//!
//! Keys are the stable identifiers stored on profiles and shipment requests,
//! values are display names.

/// The 13 administrative regions of Saudi Arabia.
pub const REGIONS: &[(&str, &str)] = &[
    ("riyadh", "Riyadh Region"),
    ("makkah", "Makkah Region"),
    ("eastern", "Eastern Province"),
    ("madinah", "Madinah Region"),
    ("qassim", "Qassim Region"),
    ("hail", "Hail Region"),
    ("tabuk", "Tabuk Region"),
    ("northern_borders", "Northern Borders Region"),
    ("jazan", "Jazan Region"),
    ("najran", "Najran Region"),
    ("al_bahah", "Al Bahah Region"),
    ("al_jawf", "Al Jawf Region"),
    ("asir", "Asir Region"),
];

const RIYADH_CITIES: &[(&str, &str)] = &[
    ("riyadh", "Riyadh"),
    ("diriyah", "Diriyah"),
    ("alkharj", "Al Kharj"),
    ("dhurma", "Dhurma"),
    ("muzahmiyya", "Al Muzahmiyya"),
    ("wadi_ad_dawasir", "Wadi Ad-Dawasir"),
    ("afif", "Afif"),
    ("shagra", "Al Shagra"),
    ("hotat_bani_tamim", "Hotat Bani Tamim"),
    ("layla", "Layla"),
    ("sulayyil", "As Sulayyil"),
    ("aflaj", "Aflaj"),
    ("dilam", "Dilam"),
    ("ramah", "Ramah"),
    ("thadiq", "Thadiq"),
    ("huraymila", "Huraymila"),
    ("majmaah", "Al Majmaah"),
    ("quwayiyah", "Quwayiyah"),
    ("dawadmi", "Ad Dawadmi"),
    ("harmah", "Harmah"),
    ("shaqra", "Shaqra"),
];

const MAKKAH_CITIES: &[(&str, &str)] = &[
    ("makkah", "Makkah"),
    ("jeddah", "Jeddah"),
    ("taif", "At Taif"),
    ("kamil", "Al Kamil"),
    ("khulays", "Khulays"),
    ("qunfudhah", "Al Qunfudhah"),
    ("lith", "Al Lith"),
    ("rabigh", "Rabigh"),
    ("ranyah", "Ranyah"),
    ("turbah", "Turbah"),
    ("khurmah", "Al Khurmah"),
    ("maysan", "Maysan"),
    ("adhlam", "Adhlam"),
];

const EASTERN_CITIES: &[(&str, &str)] = &[
    ("dammam", "Dammam"),
    ("khobar", "Al Khobar"),
    ("dhahran", "Dhahran"),
    ("jubail", "Al Jubail"),
    ("qatif", "Al Qatif"),
    ("hafr_albatin", "Hafr Al-Batin"),
    ("ahsa", "Al Ahsa"),
    ("jubail_industrial", "Jubail Industrial City"),
    ("ras_tanura", "Ras Tanura"),
    ("abqaiq", "Abqaiq"),
    ("nuayriyah", "An Nuayriyah"),
];

const MADINAH_CITIES: &[(&str, &str)] = &[
    ("madinah", "Al Madinah"),
    ("yanbu", "Yanbu"),
    ("badr", "Badr"),
    ("khaybar", "Khaybar"),
    ("al_ula", "Al Ula"),
    ("mahd_adh_dhahab", "Mahd Adh Dhahab"),
    ("hanakiyah", "Al Hanakiyah"),
    ("wajh", "Al Wajh"),
];

const QASSIM_CITIES: &[(&str, &str)] = &[
    ("buraidah", "Buraidah"),
    ("unayzah", "Unaizah"),
    ("rass", "Ar Rass"),
    ("muthnab", "Al Muthnab"),
    ("bukayriyah", "Al Bukayriyah"),
    ("badaya", "Al Badaya"),
    ("riyadh_alkhabra", "Riyadh Al Khabra"),
    ("nabhaniyah", "An Nabhaniyah"),
    ("ash_shimasiyah", "Ash Shimasiyah"),
];

const HAIL_CITIES: &[(&str, &str)] = &[
    ("hail", "Hail"),
    ("baqa", "Al Baqa"),
    ("shinan", "Ash Shinan"),
    ("ghazala", "Al Ghazala"),
    ("sumaira", "As Sumaira"),
    ("mawqaq", "Mawqaq"),
];

const TABUK_CITIES: &[(&str, &str)] = &[
    ("tabuk", "Tabuk"),
    ("duba", "Duba"),
    ("alwajh", "Al Wajh"),
    ("haql", "Haql"),
    ("umluj", "Umluj"),
    ("tayma", "Tayma"),
];

const NORTHERN_BORDERS_CITIES: &[(&str, &str)] = &[
    ("arar", "Arar"),
    ("turaif", "Turaif"),
    ("rafha", "Rafha"),
];

const JAZAN_CITIES: &[(&str, &str)] = &[
    ("jazan", "Jazan"),
    ("sabya", "Sabya"),
    ("abu_arish", "Abu Arish"),
    ("damad", "Damad"),
    ("samtah", "Samtah"),
    ("al_ardah", "Al Ardah"),
    ("baish", "Baish"),
    ("farasan", "Farasan"),
    ("dayer", "Ad Dayer"),
    ("aidabi", "Aidabi"),
];

const NAJRAN_CITIES: &[(&str, &str)] = &[
    ("najran", "Najran"),
    ("sharourah", "Sharourah"),
    ("hubuna", "Hubuna"),
    ("badr_aljanub", "Badr Al Janub"),
    ("yadamah", "Yadamah"),
    ("thar", "Thar"),
];

const AL_BAHAH_CITIES: &[(&str, &str)] = &[
    ("al_bahah", "Al Bahah"),
    ("baljurashi", "Baljurashi"),
    ("al_mandaq", "Al Mandaq"),
    ("al_makhwah", "Al Makhwah"),
    ("al_aqiq", "Al Aqiq"),
    ("qilwah", "Qilwah"),
];

const AL_JAWF_CITIES: &[(&str, &str)] = &[
    ("sakaka", "Sakaka"),
    ("qurayyat", "Qurayyat"),
    ("dawmat_aljandal", "Dawmat Al Jandal"),
    ("tabarjal", "Tabarjal"),
];

const ASIR_CITIES: &[(&str, &str)] = &[
    ("abha", "Abha"),
    ("khamis_mushait", "Khamis Mushait"),
    ("bisha", "Bisha"),
    ("muhayil", "Muhayil"),
    ("sarat_abidah", "Sarat Abidah"),
    ("nanman", "An Naman"),
    ("dhahran_aljanub", "Dhahran Al Janub"),
    ("tathlith", "Tathlith"),
    ("rijal_almah", "Rijal Alma"),
    ("balqarn", "Balqarn"),
];

/// Cities of a region, or an empty slice when the region key is unknown.
pub fn cities(region: &str) -> &'static [(&'static str, &'static str)] {
    match region {
        "riyadh" => RIYADH_CITIES,
        "makkah" => MAKKAH_CITIES,
        "eastern" => EASTERN_CITIES,
        "madinah" => MADINAH_CITIES,
        "qassim" => QASSIM_CITIES,
        "hail" => HAIL_CITIES,
        "tabuk" => TABUK_CITIES,
        "northern_borders" => NORTHERN_BORDERS_CITIES,
        "jazan" => JAZAN_CITIES,
        "najran" => NAJRAN_CITIES,
        "al_bahah" => AL_BAHAH_CITIES,
        "al_jawf" => AL_JAWF_CITIES,
        "asir" => ASIR_CITIES,
        _ => &[],
    }
}

/// Display name of a region key.
pub fn region_name(region: &str) -> Option<&'static str> {
    REGIONS
        .iter()
        .find(|(key, _)| *key == region)
        .map(|(_, name)| *name)
}

pub fn is_known_region(region: &str) -> bool {
    region_name(region).is_some()
}

/// Whether `city` is one of the cities listed under `region`.
pub fn is_city_in_region(region: &str, city: &str) -> bool {
    cities(region).iter().any(|(key, _)| *key == city)
}
