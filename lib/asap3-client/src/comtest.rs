// Copyright 2022 Ingemar Hedvall
// SPDX-License-Identifier: MIT
use log::{info, warn};

use crate::client::Client;
use crate::error::ClientError;
use crate::parameter::{Parameter, ParameterList};

use asap3_codec::DataType;

const GET_PARAMETER_COUNT: &str = "Get Number of Parameters";
const GET_PARAMETER_CONFIG: &str = "Get Parameter Configuration";

/// A higher-level client that discovers its own parameter list from the
/// server instead of requiring the caller to supply one upfront. Named
/// `QueryComTestParameters` in the original (which also ships a
/// near-duplicate factory spelled `QueryCtParameters` for the same
/// variant); this crate keeps a single name and documents the alias here
/// rather than duplicating the command enum.
pub struct ComTestClient {
    client: Client,
}

impl ComTestClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Runs the base handshake, `QUERY_AVAILABLE_SERVICE`, the three
    /// fire-and-forget toggle services, and then parameter discovery.
    pub async fn start(&self) -> Result<(), ClientError> {
        self.client.start().await?;
        self.client.query_available_service().await?;
        self.enable_optional_services().await;

        if !self.client.has_service(GET_PARAMETER_COUNT) {
            return Err(ClientError::MissingService(GET_PARAMETER_COUNT.to_string()));
        }
        if !self.client.has_service(GET_PARAMETER_CONFIG) {
            return Err(ClientError::MissingService(GET_PARAMETER_CONFIG.to_string()));
        }

        self.client.set_parameter_list(Vec::new());

        let count_text = self.client.execute_service(GET_PARAMETER_COUNT, "").await?;
        let count: usize = count_text.trim().parse().unwrap_or(0);
        info!("server advertises {count} ComTest parameters");

        let mut parameters = ParameterList::new();
        let mut index = 0usize;
        while index < count {
            let chunk_end = (index + 50).min(count);
            // The original always sends the literal "1,44" here regardless
            // of the computed range. This rewrite sends the real range.
            let input = format!("{},{}", index + 1, chunk_end);
            let config_text = self.client.execute_service(GET_PARAMETER_CONFIG, &input).await?;
            parameters.extend(parse_ct_parameter_config(&config_text));
            index = chunk_end;
        }

        self.client.set_parameter_list(parameters);
        Ok(())
    }

    /// Gated on `has_service`; each toggle is fire-and-forget, matching the
    /// original's disregard for their replies.
    async fn enable_optional_services(&self) {
        for name in ["Use Extended Poll", "Disable SetValue Ack", "Support Invalid Output"] {
            if self.client.has_service(name) {
                if let Err(err) = self.client.execute_service(name, "1").await {
                    warn!("optional service {name:?} failed: {err}");
                }
            }
        }
    }
}

/// The original's `Asap3Helper::ParseCtParameterConfigString` was not
/// present in the retrieved source. This rewrite defines a `;`-separated
/// list of `name,unit,description` triples as a reasonable stand-in.
fn parse_ct_parameter_config(text: &str) -> ParameterList {
    text.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let mut fields = entry.split(',').map(str::trim);
            let name = fields.next().unwrap_or(entry);
            let mut parameter = Parameter::new(name, DataType::Float32, false);
            parameter.unit = fields.next().unwrap_or_default().to_string();
            parameter.description = fields.next().unwrap_or_default().to_string();
            parameter
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_semicolon_separated_triple_list() {
        let parameters = parse_ct_parameter_config("Rpm,1/min,Engine speed;Torque,Nm,Engine torque");
        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters[0].name, "Rpm");
        assert_eq!(parameters[1].name, "Torque");
    }

    #[test]
    fn ignores_blank_entries() {
        let parameters = parse_ct_parameter_config("Rpm,1/min,Engine speed;;  ;");
        assert_eq!(parameters.len(), 1);
    }
}
