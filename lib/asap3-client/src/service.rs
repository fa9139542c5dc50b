// Copyright 2022 Ingemar Hedvall
// SPDX-License-Identifier: MIT

/// One entry of the server's advertised service catalog.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Service {
    pub name: String,
    pub info: String,
}

/// The set of services `QUERY_AVAILABLE_SERVICE` advertised, looked up
/// case-insensitively as the original does.
#[derive(Clone, Debug, Default)]
pub struct ServiceCatalog(Vec<Service>);

impl ServiceCatalog {
    pub fn set_from_names(&mut self, names: Vec<String>) {
        self.0 = names
            .into_iter()
            .map(|name| Service {
                name,
                info: String::new(),
            })
            .collect();
    }

    pub fn has(&self, name: &str) -> bool {
        self.0.iter().any(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn set_info(&mut self, name: &str, info: String) {
        if let Some(service) = self.0.iter_mut().find(|s| s.name.eq_ignore_ascii_case(name)) {
            service.info = info;
        }
    }

    pub fn get(&self, name: &str) -> Option<&Service> {
        self.0.iter().find(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Service> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let mut catalog = ServiceCatalog::default();
        catalog.set_from_names(vec!["Get Number of Parameters".to_string()]);
        assert!(catalog.has("get number of parameters"));
        assert!(!catalog.has("Get Parameter Configuration"));
    }
}
