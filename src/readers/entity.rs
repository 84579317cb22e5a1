use super::document::Element;
use crate::record::{BusinessRecord, HouseNumber};


/// Element paths of the mapped fields relative to the entity element
pub mod fields {
    pub const IDENTIFICATION_NUMBER: &[&str] = &["ICO"];
    pub const TAX_IDENTIFICATION_NUMBER: &[&str] = &["DIC"];
    pub const COMPANY_NAME: &[&str] = &["OF"];
    pub const CREATED: &[&str] = &["DV"];
    pub const DISSOLVED: &[&str] = &["DZ"];

    pub const ZIP: &[&str] = &["AA", "PSC"];
    pub const STREET: &[&str] = &["AA", "NU"];
    pub const CITY: &[&str] = &["AA", "N"];
    pub const STREET_NUMBER: &[&str] = &["AA", "CD"];
    pub const ORIENTATION_NUMBER: &[&str] = &["AA", "CO"];
    pub const ORIENTATION_LETTER: &[&str] = &["AA", "CA"];
    pub const CITY_POST_OFFICE: &[&str] = &["AA", "NMC"];
    pub const CITY_DISTRICT: &[&str] = &["AA", "NCO"];

    pub const IS_PERSON: &[&str] = &["PF", "KPF"];
    pub const NATURE_OF_BUSINESS: &[&str] = &["Nace", "NACE"];

    pub const COURT_REGISTRATION: &[&str] = &["ROR"];
    /// Relative to the court registration
    pub const FILE_NUMBER: &[&str] = &["SZ", "OV"];
    /// Relative to the court registration
    pub const COURT: &[&str] = &["SZ", "SD", "T"];
}


/// The entity element of a response, possibly missing, with its data namespace
#[derive(Debug, Clone, Copy)]
pub struct Entity<'a> {
    element: Option<&'a Element>,
    namespace: &'a str,
}

impl<'a> Entity<'a> {
    pub fn new(element: Option<&'a Element>, namespace: &'a str) -> Entity<'a> {
        Entity { element, namespace }
    }

    fn get(&self, path: &[&str]) -> Option<&'a Element> {
        self.element?.path(self.namespace, path)
    }

    /// The text of the field or an empty string if it doesn't exist
    fn text(&self, path: &[&str]) -> String {
        self.get(path).map(|el| el.text.clone()).unwrap_or_default()
    }

    fn text_opt(&self, path: &[&str]) -> Option<String> {
        self.get(path).map(|el| el.text.clone())
    }

    fn all(&self, path: &[&str]) -> Vec<String> {
        match self.element {
            Some(element) => element
                .path_all(self.namespace, path)
                .into_iter()
                .map(|el| el.text.clone())
                .collect(),
            None => Vec::new(),
        }
    }

    fn group(&self, path: &[&str]) -> Option<Entity<'a>> {
        self.get(path).map(|element| Entity::new(Some(element), self.namespace))
    }
}


/// Map the entity into a record. Every field has a default so mapping never fails.
pub fn map(entity: Entity) -> BusinessRecord {
    let (file_number, court) = match entity.group(fields::COURT_REGISTRATION) {
        Some(registration) => (registration.text(fields::FILE_NUMBER), registration.text(fields::COURT)),
        None => (String::new(), String::new()),
    };

    BusinessRecord {
        identification_number: entity.text(fields::IDENTIFICATION_NUMBER),
        tax_identification_number: entity.text(fields::TAX_IDENTIFICATION_NUMBER),
        company_name: entity.text(fields::COMPANY_NAME),
        zip: entity.text(fields::ZIP),
        street: entity.text(fields::STREET),
        city: entity.text(fields::CITY),
        city_post_office: entity.text(fields::CITY_POST_OFFICE),
        city_district: entity.text(fields::CITY_DISTRICT),
        house_number: HouseNumber {
            street_number: entity.text(fields::STREET_NUMBER),
            orientation_number: entity.text(fields::ORIENTATION_NUMBER),
            orientation_letter: entity.text(fields::ORIENTATION_LETTER),
        },
        is_person: entity.text(fields::IS_PERSON),
        created_date: entity.text(fields::CREATED),
        dissolved_date: entity.text_opt(fields::DISSOLVED),
        nature_of_business_codes: entity.all(fields::NATURE_OF_BUSINESS),
        file_number,
        court,
    }
}
