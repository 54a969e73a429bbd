//! Emergency contacts kept in memory for the session.

use serde::{Deserialize, Serialize};

const TEL_SCHEME: &str = "tel:";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactError {
    #[error("please enter both name and phone number")]
    Blank,

    #[error("no contact at index {0}")]
    NotFound(usize),
}

/// A named phone number, stored as a `tel:` URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub phone: String,
}

impl Contact {
    /// Validates and normalises user input into a contact.
    pub fn new(name: &str, phone: &str) -> Result<Self, ContactError> {
        let name = name.trim();
        let phone = phone.trim();
        if name.is_empty() || phone.is_empty() {
            return Err(ContactError::Blank);
        }

        Ok(Self {
            name: name.to_string(),
            phone: to_tel_uri(phone),
        })
    }

    /// URI handed to the dialer.
    pub fn dial_uri(&self) -> &str {
        &self.phone
    }

    /// Phone number without the `tel:` scheme, for display.
    pub fn display_number(&self) -> &str {
        self.phone.strip_prefix(TEL_SCHEME).unwrap_or(&self.phone)
    }
}

fn to_tel_uri(phone: &str) -> String {
    if phone.starts_with(TEL_SCHEME) {
        phone.to_string()
    } else {
        format!("{TEL_SCHEME}{phone}")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactBook {
    contacts: Vec<Contact>,
}

impl ContactBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// The book the app starts with.
    pub fn with_defaults() -> Self {
        Self {
            contacts: vec![
                Contact { name: "Home".to_string(), phone: "tel:111".to_string() },
                Contact { name: "Someone".to_string(), phone: "tel:555".to_string() },
            ],
        }
    }

    /// Appends a contact and returns its index.
    pub fn add(&mut self, name: &str, phone: &str) -> Result<usize, ContactError> {
        let contact = Contact::new(name, phone)?;
        self.contacts.push(contact);
        Ok(self.contacts.len() - 1)
    }

    pub fn update(&mut self, index: usize, name: &str, phone: &str) -> Result<(), ContactError> {
        let contact = Contact::new(name, phone)?;
        let slot = self.contacts.get_mut(index).ok_or(ContactError::NotFound(index))?;
        *slot = contact;
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Contact, ContactError> {
        if index >= self.contacts.len() {
            return Err(ContactError::NotFound(index));
        }
        Ok(self.contacts.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&Contact> {
        self.contacts.get(index)
    }

    pub fn list(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}

/// A diplomatic mission travellers can call for help.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Embassy {
    pub name: &'static str,
    pub address: Option<&'static str>,
    pub phone: &'static str,
    pub email: Option<&'static str>,
    pub website: Option<&'static str>,
}

impl Embassy {
    const fn minimal(name: &'static str, phone: &'static str) -> Self {
        Self {
            name,
            address: None,
            phone,
            email: None,
            website: None,
        }
    }

    pub fn dial_uri(&self) -> String {
        to_tel_uri(self.phone)
    }

    pub fn mailto_uri(&self) -> Option<String> {
        self.email.map(|email| format!("mailto:{email}"))
    }
}

/// Missions grouped by the country they represent.
pub const EMBASSY_DIRECTORY: &[(&str, &[Embassy])] = &[
    (
        "USA",
        &[
            Embassy {
                name: "US Embassy - Colombo",
                address: Some("210 Galle Rd, Colombo 03, Sri Lanka"),
                phone: "+94 11 2498500",
                email: Some("conscolombo@state.gov"),
                website: Some("https://lk.usembassy.gov/"),
            },
            Embassy::minimal("US Consulate - Jaffna", "+94 21 2221234"),
        ],
    ),
    (
        "UK",
        &[Embassy {
            name: "British High Commission",
            address: Some("389 Bauddhaloka Mawatha, Colombo 07"),
            phone: "+94 11 5390639",
            email: Some("britembsl@fco.gov.uk"),
            website: Some("https://www.gov.uk/world/organisations/british-high-commission-colombo"),
        }],
    ),
    (
        "India",
        &[
            Embassy {
                name: "Indian High Commission",
                address: Some("36-38 Galle Road, Colombo 03"),
                phone: "+94 11 2422788",
                email: Some("cons.colombo@mea.gov.in"),
                website: Some("https://hcicolombo.gov.in"),
            },
            Embassy::minimal("Deputy High Commission - Kandy", "+94 81 2222222"),
        ],
    ),
];

/// Missions for a country, matched case-insensitively. Empty when unknown.
pub fn embassies_for(country: &str) -> &'static [Embassy] {
    EMBASSY_DIRECTORY
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(country.trim()))
        .map(|(_, embassies)| *embassies)
        .unwrap_or(&[])
}
