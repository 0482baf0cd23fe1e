//! Patient flattening
//!
//! Collapses the nested FHIR Patient into one `patients` row. Only the first
//! element of each repeated field is considered; a missing level at any depth
//! yields a null column.

use crate::refined::Patient;
use crate::schema::{Address, HumanName, PatientResource};
use chrono::{DateTime, Utc};

/// Separator used when joining address lines
pub const ADDRESS_LINE_SEPARATOR: &str = ",";

/// Flatten a validated Patient resource into a `patients` row
pub fn flatten_patient(resource: &PatientResource, import_date: DateTime<Utc>) -> Patient {
    let name = first(&resource.name);
    let address = first(&resource.address);

    Patient {
        id: resource.id.clone(),
        resource_id: resource.id.clone(),
        first_name: name.and_then(|name| first(&name.given)).cloned(),
        last_name: name.and_then(family_name),
        prefix: name.and_then(|name| first(&name.prefix)).cloned(),
        gender: resource.gender.clone(),
        birth_date: resource.birth_date,
        deceased_date_time: resource.deceased_date_time,
        marital_status: resource
            .marital_status
            .as_ref()
            .and_then(|status| status.first_code())
            .map(str::to_string),
        multiple_birth_boolean: resource.multiple_birth_boolean,
        address_line: address.and_then(address_line),
        address_city: address.and_then(|a| a.city.clone()),
        address_state: address.and_then(|a| a.state.clone()),
        address_postal_code: address.and_then(|a| a.postal_code.clone()),
        address_country: address.and_then(|a| a.country.clone()),
        import_date: Some(import_date),
        ..Default::default()
    }
}

fn first<T>(items: &Option<Vec<T>>) -> Option<&T> {
    items.as_deref().and_then(<[T]>::first)
}

fn family_name(name: &HumanName) -> Option<String> {
    name.family
        .as_ref()
        .and_then(|family| family.representative())
        .map(str::to_string)
}

fn address_line(address: &Address) -> Option<String> {
    match address.line.as_deref() {
        Some(lines) if !lines.is_empty() => Some(lines.join(ADDRESS_LINE_SEPARATOR)),
        _ => None,
    }
}
