//! Petfinder API client.
//!
//! # Design
//! `Client` owns the credentials, the response format and two pieces of
//! session state: the token and the last request URL. Every operation goes
//! through one dispatcher that
//!
//! 1. fetches a token first if the operation requires one and none is held,
//! 2. adds the token to the call parameters,
//! 3. builds the URL with `key` and `format` leading the query,
//! 4. records the URL as the last request,
//! 5. hands it to the `Transport` and returns the body untouched.
//!
//! No operation needs a token by default; `require_token` opts one in.
//!
//! # Concurrency
//! Operations take `&mut self` because they update the token and the last
//! request. The client is not meant to be shared across threads without a
//! lock; wrap it in a `Mutex` if it must be.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ConfigError, TransportError};
use crate::http::{Transport, UreqTransport};
use crate::request::{encode_query, signature};
use crate::types::{Input, Operation, Params, ResponseFormat};

/// Blocking client for the Petfinder API.
pub struct Client<T = UreqTransport> {
    api_key: String,
    api_secret: Option<String>,
    base_url: String,
    response_format: ResponseFormat,
    token_required: HashSet<Operation>,
    token: Option<String>,
    last_request: Option<String>,
    transport: T,
}

impl Client<UreqTransport> {
    /// Client for the public endpoint over the default transport.
    pub fn new(api_key: &str, api_secret: Option<&str>) -> Self {
        Self::with_config(ClientConfig::new(api_key, api_secret))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(&config.user_agent, config.timeout());
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let mut client = Self {
            api_key: config.api_key,
            api_secret: config.api_secret,
            base_url: format!("{}/", config.base_url.trim_end_matches('/')),
            response_format: config.response_format,
            token_required: HashSet::new(),
            token: None,
            last_request: None,
            transport,
        };
        for operation in config.token_required {
            client.require_token(operation);
        }
        client
    }

    pub fn response_format(&self) -> ResponseFormat {
        self.response_format
    }

    /// Switch to `json` or `xml`. Anything else is rejected and the current
    /// format is kept.
    pub fn set_response_format(&mut self, format: &str) -> Result<(), ConfigError> {
        self.response_format = format.parse()?;
        Ok(())
    }

    /// The URL most recently built, including the boilerplate parameters.
    pub fn last_request(&self) -> Option<&str> {
        self.last_request.as_deref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Overwrite the session token. The value is not checked.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Make `operation` carry a session token, fetched on first use.
    ///
    /// Returns `false` for `auth.getToken`, which can never require one.
    pub fn require_token(&mut self, operation: Operation) -> bool {
        if operation == Operation::AuthGetToken {
            return false;
        }
        self.token_required.insert(operation);
        true
    }

    pub fn requires_token(&self, operation: Operation) -> bool {
        self.token_required.contains(&operation)
    }

    /// Signature sent with `auth.getToken`. A missing secret signs as empty.
    pub fn signature(&self) -> String {
        signature(
            self.api_secret.as_deref().unwrap_or_default(),
            &self.api_key,
            self.response_format,
        )
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `auth.getToken`: a token valid for a timed session.
    pub fn auth_get_token(&mut self) -> Result<String, TransportError> {
        self.request(Operation::AuthGetToken, Params::new())
    }

    /// `breed.list`: breeds of one animal. A scalar is the animal name.
    pub fn breed_list(&mut self, input: impl Into<Input>) -> Result<String, TransportError> {
        self.call(Operation::BreedList, input.into().into_params("animal"))
    }

    /// `pet.get`: a single pet record. A scalar is the pet id.
    pub fn pet_get(&mut self, input: impl Into<Input>) -> Result<String, TransportError> {
        self.call(Operation::PetGet, input.into().into_params("id"))
    }

    /// `pet.getRandom`: a randomly selected pet record.
    pub fn pet_get_random(&mut self, params: Params) -> Result<String, TransportError> {
        self.call(Operation::PetGetRandom, params)
    }

    /// `pet.find`: pet records near a location. A scalar is the location.
    pub fn pet_find(&mut self, input: impl Into<Input>) -> Result<String, TransportError> {
        self.call(Operation::PetFind, input.into().into_params("location"))
    }

    /// `shelter.find`: shelters near a location. A scalar is the location.
    pub fn shelter_find(&mut self, input: impl Into<Input>) -> Result<String, TransportError> {
        self.call(Operation::ShelterFind, input.into().into_params("location"))
    }

    /// `shelter.get`: a single shelter record. A scalar is the shelter id.
    pub fn shelter_get(&mut self, input: impl Into<Input>) -> Result<String, TransportError> {
        self.call(Operation::ShelterGet, input.into().into_params("id"))
    }

    /// `shelter.getPets`: pets of one shelter. A scalar is the shelter id.
    pub fn shelter_get_pets(&mut self, input: impl Into<Input>) -> Result<String, TransportError> {
        self.call(Operation::ShelterGetPets, input.into().into_params("id"))
    }

    /// `shelter.listByBreed`: shelters listing animals of a breed.
    pub fn shelter_list_by_breed(&mut self, params: Params) -> Result<String, TransportError> {
        self.call(Operation::ShelterListByBreed, params)
    }

    /// Run any operation with an explicit mapping. `auth.getToken` gets its
    /// signature added.
    pub fn request(
        &mut self,
        operation: Operation,
        params: Params,
    ) -> Result<String, TransportError> {
        match operation {
            Operation::AuthGetToken => {
                let sig = self.signature();
                self.call(operation, params.with("sig", sig))
            }
            _ => self.call(operation, params),
        }
    }

    fn call(&mut self, operation: Operation, mut params: Params) -> Result<String, TransportError> {
        if self.requires_token(operation) {
            if !self.holds_token() {
                self.acquire_token()?;
            }
            if let Some(token) = &self.token {
                params.insert("token", token.clone());
            }
        }

        let url = self.request_url(operation, &params);
        debug!(operation = %operation, url = %url, "petfinder request");

        self.last_request = Some(url.clone());
        self.transport.fetch(&url)
    }

    /// An empty token or `"0"` counts as none held.
    fn holds_token(&self) -> bool {
        self.token
            .as_deref()
            .is_some_and(|token| !token.is_empty() && token != "0")
    }

    /// Run `auth.getToken` and keep whatever token the body carries.
    fn acquire_token(&mut self) -> Result<(), TransportError> {
        debug!("no session token held, requesting one");
        let body = self.auth_get_token()?;
        match self.response_format.token_extractor().extract_token(&body) {
            Some(token) => self.token = Some(token),
            None => warn!(
                format = %self.response_format,
                "no token in auth.getToken response, continuing without one"
            ),
        }
        Ok(())
    }

    fn request_url(&self, operation: Operation, params: &Params) -> String {
        let boilerplate = Params::new()
            .with("key", self.api_key.as_str())
            .with("format", self.response_format.as_str());
        let query = encode_query(&boilerplate.merged(params));
        format!("{}{}?{}", self.base_url, operation.remote_name(), query)
    }
}
