use crate::models::{NearbyResource, ResourceKind};

const MAPS_BASE_URL: &str = "https://maps.google.com/";

const BLOOD_BANKS: &[(&str, &str, &str)] = &[
    ("LifeSource Blood Center", "123 Vital Ave, Los Angeles", "(555) 123-4567"),
    ("Community Blood Bank", "456 Hope St, Los Angeles", "(555) 765-4321"),
    ("Red River Donations", "789 Grace Ln, Los Angeles", "(555) 888-9999"),
];

const HOSPITALS: &[(&str, &str, &str)] = &[
    ("City General Hospital", "101 Health Blvd, Los Angeles", "(555) 222-3333"),
    ("St. Jude Medical Center", "202 Mercy Way, Los Angeles", "(555) 444-5555"),
    ("LA County+USC Medical Center", "303 Wellness Rd, Los Angeles", "(555) 666-7777"),
];

/// Static directory of nearby blood banks and hospitals
#[derive(Debug, Clone)]
pub struct ResourceDirectory {
    blood_banks: Vec<NearbyResource>,
    hospitals: Vec<NearbyResource>,
}

impl ResourceDirectory {
    pub fn new() -> Self {
        Self {
            blood_banks: build(BLOOD_BANKS, ResourceKind::BloodBank),
            hospitals: build(HOSPITALS, ResourceKind::Hospital),
        }
    }

    pub fn blood_banks(&self) -> &[NearbyResource] {
        &self.blood_banks
    }

    pub fn hospitals(&self) -> &[NearbyResource] {
        &self.hospitals
    }
}

impl Default for ResourceDirectory {
    fn default() -> Self {
        Self::new()
    }
}

fn build(entries: &[(&str, &str, &str)], kind: ResourceKind) -> Vec<NearbyResource> {
    entries
        .iter()
        .map(|(name, address, phone)| NearbyResource {
            name: name.to_string(),
            address: address.to_string(),
            phone: phone.to_string(),
            map_url: map_url(address),
            kind,
        })
        .collect()
}

/// Map search link for an address
pub fn map_url(address: &str) -> String {
    format!("{}?q={}", MAPS_BASE_URL, urlencoding::encode(address))
}
