// Copyright 2022 Ingemar Hedvall
// SPDX-License-Identifier: MIT
use std::sync::{Arc, Mutex};

use asap3_codec::{DataList, DataValue, Value};
use asap3_proto::{
    exit_request, identify_request, init_request, CommandCode, DispatchOutcome, ProtoError,
    Request, StatusCode, Telegram,
};
use asap3_sender::{ListenSink, NullListenSink, ServerAddr};
use log::{debug, info};
use tokio::task::JoinHandle;

use crate::cache::ValueCache;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::parameter::{Parameter, ParameterList};
use crate::service::ServiceCatalog;

#[derive(Default)]
struct ClientState {
    remote_version: u16,
    remote_name: String,
    services: ServiceCatalog,
    cache: ValueCache,
    parameters: ParameterList,
}

struct ClientInner {
    handle: asap3_sender::SenderHandle,
    config: ClientConfig,
    state: Mutex<ClientState>,
}

/// The entry point: a cheaply cloneable handle over the connection, its
/// negotiated identity, its parameter list, and its value caches. Cloning a
/// `Client` shares the same underlying connection.
#[derive(Clone)]
pub struct Client(Arc<ClientInner>);

impl Client {
    /// Opens the telegram queue and spawns the reactor/dispatcher tasks.
    /// Does not perform the `INIT`/`IDENTIFY` handshake — call [`Client::start`]
    /// for that once the returned tasks are running.
    pub fn connect(config: ClientConfig) -> (Self, JoinHandle<()>, JoinHandle<()>) {
        Self::connect_with_listen_sink(config, Arc::new(NullListenSink))
    }

    pub fn connect_with_listen_sink(
        config: ClientConfig,
        sink: Arc<dyn ListenSink>,
    ) -> (Self, JoinHandle<()>, JoinHandle<()>) {
        let addr = ServerAddr::new(config.host.clone(), config.port);
        let (sender, handle) = asap3_sender::connect(addr);
        let (reactor_task, dispatcher_task) = sender
            .with_listen_sink(sink)
            .with_timing(config.connect_timeout, config.read_timeout, config.retry_delay)
            .run();
        let client = Self(Arc::new(ClientInner {
            handle,
            config,
            state: Mutex::new(ClientState::default()),
        }));
        (client, reactor_task, dispatcher_task)
    }

    /// Sends `INIT` then `IDENTIFY(version, name)` and waits for both to
    /// complete.
    pub async fn start(&self) -> Result<(), ClientError> {
        info!("starting handshake");
        self.send(init_request()).await?;
        let version = self.0.config.version;
        let name = self.0.config.name.clone();
        self.send(identify_request(version, &name)).await?;
        Ok(())
    }

    /// Sends `EXIT`; the connection is expected to go down shortly after.
    pub async fn stop(&self) -> Result<(), ClientError> {
        info!("stopping");
        self.send(exit_request()).await?;
        Ok(())
    }

    pub fn remote_version(&self) -> u16 {
        self.0.state.lock().unwrap().remote_version
    }

    pub fn remote_name(&self) -> String {
        self.0.state.lock().unwrap().remote_name.clone()
    }

    /// Stores `list` and force-sets `exist=true` on every entry, regardless
    /// of what the caller passed in.
    pub fn set_parameter_list(&self, list: ParameterList) {
        let mut state = self.0.state.lock().unwrap();
        state.parameters = list
            .into_iter()
            .map(|mut parameter| {
                parameter.exist = true;
                parameter
            })
            .collect();
    }

    pub fn parameter_list(&self) -> ParameterList {
        self.0.state.lock().unwrap().parameters.clone()
    }

    /// Resets any prior subscription, then re-subscribes in chunks of at
    /// most 50 parameters, assigning each a `value_index` within its own
    /// (online vs. output) cache.
    pub async fn start_subscription(&self) -> Result<bool, ClientError> {
        let parameters = self.0.state.lock().unwrap().parameters.clone();
        if parameters.is_empty() {
            return Ok(false);
        }

        let scan_rate = self.0.config.scan_rate;
        self.send(Request::new(
            CommandCode::ParameterForValueAcquisitionEv2,
            vec![
                DataValue::new("LUN", Value::UInt16(0)),
                DataValue::new("SampleRate", Value::UInt16(scan_rate)),
                DataValue::new("Measurements", Value::UInt16(0)),
            ],
        ))
        .await?;

        let mut online_index = 0usize;
        let mut output_index = 0usize;
        let mut indexed = Vec::with_capacity(parameters.len());
        for mut parameter in parameters {
            if parameter.set_point {
                parameter.value_index = output_index;
                output_index += 1;
            } else {
                parameter.value_index = online_index;
                online_index += 1;
            }
            indexed.push(parameter);
        }

        for (chunk_index, chunk) in indexed.chunks(50).enumerate() {
            let mut data = vec![
                DataValue::new("LUN", Value::UInt16(0)),
                DataValue::new("SampleRate", Value::UInt16(scan_rate)),
                DataValue::new("Measurements", Value::UInt16(chunk.len() as u16)),
            ];
            for (offset, parameter) in chunk.iter().enumerate() {
                let global_index = chunk_index * 50 + offset + 1;
                data.push(DataValue::new(
                    format!("Name {global_index}"),
                    Value::String(parameter.name.clone()),
                ));
            }
            debug!("subscribing chunk {chunk_index} ({} parameters)", chunk.len());
            self.send(Request::new(CommandCode::ParameterForValueAcquisitionEv2, data))
                .await?;
        }

        self.0.state.lock().unwrap().parameters = indexed;
        Ok(true)
    }

    pub fn is_subscription_initialized(&self) -> bool {
        let state = self.0.state.lock().unwrap();
        state.parameters.iter().filter(|p| p.exist).all(|parameter| {
            let cache = if parameter.set_point {
                &state.cache.output_values
            } else {
                &state.cache.online_values
            };
            cache
                .get(parameter.value_index)
                .is_some_and(|entry| entry.name == parameter.name)
        })
    }

    fn cache_schema(parameters: &ParameterList, set_point: bool) -> DataList {
        let mut matching: Vec<&Parameter> = parameters.iter().filter(|p| p.set_point == set_point).collect();
        matching.sort_by_key(|p| p.value_index);
        matching
            .into_iter()
            .map(|p| DataValue::schema(p.name.clone(), p.data_type))
            .collect()
    }

    /// Sends `GET_ONLINE_VALUE_EV2` and decodes its raw reply payload
    /// against the current subscription's schema. Callers poll this at
    /// their own cadence; the server does not push values unsolicited.
    pub async fn poll_online_values(&self) -> Result<(), ClientError> {
        let response = self
            .send(Request::new(CommandCode::GetOnlineValueEv2, Vec::new()))
            .await?;
        self.set_online_data(response.raw_payload(), 0);
        Ok(())
    }

    /// Decodes `GET_ONLINE_VALUE(_EV2)`'s raw payload against the current
    /// subscription's schema.
    pub fn set_online_data(&self, body: &[u8], offset: usize) {
        let mut state = self.0.state.lock().unwrap();
        let schema = Self::cache_schema(&state.parameters, false);
        state.cache.set_online_data(body, offset, &schema);
    }

    pub fn set_output_data(&self, body: &[u8], offset: usize) {
        let mut state = self.0.state.lock().unwrap();
        let schema = Self::cache_schema(&state.parameters, true);
        state.cache.set_output_data(body, offset, &schema);
    }

    pub fn define_user_defined_data(&self, body: &[u8], offset: usize) {
        self.0.state.lock().unwrap().cache.define_user_defined_data(body, offset);
    }

    /// Sends `GET_USER_DEFINED_VALUE` and decodes its raw reply payload
    /// against the cache's current schema (as established by a prior
    /// `define_user_defined_data` call or [`Client::get_user_defined_value_list`]).
    pub async fn poll_user_defined_values(&self) -> Result<(), ClientError> {
        let response = self
            .send(Request::new(CommandCode::GetUserDefinedValue, Vec::new()))
            .await?;
        self.set_user_defined_data(response.raw_payload(), 0);
        Ok(())
    }

    /// Sends `GET_USER_DEFINED_VALUE_LIST` and seeds the user-defined cache
    /// from its `[Values:u16]` + `[LUN n, Value n]*` payload directly (this
    /// command already arrives schema-decoded, unlike the raw-payload
    /// `GET_USER_DEFINED_VALUE`/`define_user_defined_data` path).
    pub async fn get_user_defined_value_list(&self) -> Result<(), ClientError> {
        let response = self
            .send(Request::new(CommandCode::GetUserDefinedValueList, Vec::new()))
            .await?;
        let count = response.get_u16(0);
        let mut list = vec![DataValue::new("Values", Value::UInt16(count))];
        list.extend((0..count).map(|i| {
            let name = response.get_string(2 * i as usize + 2);
            DataValue::new(name, Value::Float32(f32::NAN))
        }));
        self.0.state.lock().unwrap().cache.user_defined = list;
        Ok(())
    }

    pub fn set_user_defined_data(&self, body: &[u8], offset: usize) {
        let mut state = self.0.state.lock().unwrap();
        let schema = state.cache.user_defined.clone();
        state.cache.set_user_defined_data(body, offset, &schema);
    }

    pub fn online_values(&self) -> DataList {
        self.0.state.lock().unwrap().cache.online_values.clone()
    }

    pub fn user_defined_values(&self) -> DataList {
        self.0.state.lock().unwrap().cache.user_defined.clone()
    }

    /// Sends `QUERY_AVAILABLE_SERVICE`. The response's `[Services:u16]`
    /// entry itself (index 0) is skipped; only the names from index 1
    /// onward populate the catalog.
    pub async fn query_available_service(&self) -> Result<(), ClientError> {
        let response = self
            .send(Request::new(CommandCode::QueryAvailableService, Vec::new()))
            .await?;
        let count = response.get_u16(0);
        let names = (0..count).map(|i| response.get_string(1 + i as usize)).collect();
        self.0.state.lock().unwrap().services.set_from_names(names);
        Ok(())
    }

    pub fn has_service(&self, name: &str) -> bool {
        self.0.state.lock().unwrap().services.has(name)
    }

    pub async fn get_service_information(&self, name: &str) -> Result<String, ClientError> {
        let response = self
            .send(Request::new(
                CommandCode::GetServiceInformation,
                vec![DataValue::new("Service", Value::String(name.to_string()))],
            ))
            .await?;
        let info = response.get_string(0);
        self.0.state.lock().unwrap().services.set_info(name, info.clone());
        Ok(info)
    }

    pub async fn execute_service(&self, name: &str, input: &str) -> Result<String, ClientError> {
        let response = self
            .send(Request::new(
                CommandCode::ExecuteService,
                vec![
                    DataValue::new("Service", Value::String(name.to_string())),
                    DataValue::new("Input", Value::String(input.to_string())),
                ],
            ))
            .await?;
        Ok(response.get_string(0))
    }

    /// Enqueues `request`, awaits its outcome, runs the generic
    /// `handle_telegram` reaction, and turns `STATUS_ERROR` into
    /// `ClientError::Proto`.
    pub(crate) async fn send(&self, request: Request) -> Result<asap3_proto::Response, ClientError> {
        let (telegram, rx) = Telegram::new(request);
        self.0
            .handle
            .send(telegram)
            .await
            .map_err(|_| ClientError::Disconnected)?;
        let outcome = rx.await.map_err(|_| ClientError::Disconnected)?;
        match outcome {
            DispatchOutcome::Response(response) => {
                self.handle_telegram(&response);
                if response.status() == StatusCode::Error {
                    let (code, text) = response.error_payload().unwrap_or_default();
                    return Err(ClientError::Proto(ProtoError::Server { code, text }));
                }
                Ok(response)
            }
            DispatchOutcome::Failed(err) => Err(err.into()),
        }
    }

    /// The base client's reaction to any completed response: `IDENTIFY`
    /// updates the negotiated identity, `QUERY_AVAILABLE_SERVICE`'s catalog
    /// ingestion happens at the call site instead (it needs the full
    /// response, already in scope there). `INIT`/`EXIT`/`REPEAT_REQUEST`
    /// need no state change.
    fn handle_telegram(&self, response: &asap3_proto::Response) {
        if response.cmd() == CommandCode::Identify && response.status().is_ok_or_success() {
            let mut state = self.0.state.lock().unwrap();
            state.remote_version = response.get_u16(0);
            state.remote_name = response.get_string(1);
        }
    }
}
