use std::fmt::Display;

use serde::Serialize;


/// A business entity as recorded by the registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BusinessRecord {
    pub identification_number: String,
    pub tax_identification_number: String,
    pub company_name: String,
    pub zip: String,
    pub street: String,
    pub city: String,
    pub city_post_office: String,
    pub city_district: String,
    pub house_number: HouseNumber,
    /// The person flag as recorded, non-empty for natural persons
    pub is_person: String,
    /// Date of creation in the registry format, e.g. 2006-07-24
    pub created_date: String,
    /// None while the entity has not been dissolved
    pub dissolved_date: Option<String>,
    pub nature_of_business_codes: Vec<String>,
    pub file_number: String,
    pub court: String,
}

impl BusinessRecord {
    pub fn is_natural_person(&self) -> bool {
        !self.is_person.is_empty()
    }

    pub fn is_active(&self) -> bool {
        self.dissolved_date.is_none()
    }
}


#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HouseNumber {
    pub street_number: String,
    pub orientation_number: String,
    pub orientation_letter: String,
}

impl Display for HouseNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.street_number.is_empty(), self.orientation_number.is_empty()) {
            (false, false) => write!(f, "{}/{}", self.street_number, self.orientation_number)?,
            (false, true) => write!(f, "{}", self.street_number)?,
            (true, _) => write!(f, "{}", self.orientation_number)?,
        }
        write!(f, "{}", self.orientation_letter)
    }
}
