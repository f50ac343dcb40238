use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response as ReqwestResponse, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, trace};

use super::request::Request;
use super::routing::Route;
use super::{AttachmentSource, ErrorResponse, HttpError, InteractionResponder, LightMethod};
use crate::builder::{CreateCommand, EditInteractionResponse};
use crate::constants;
use crate::internal::prelude::*;
use crate::json::{decode_resp, to_vec};
use crate::model::application::Command;
use crate::model::channel::Attachment;
use crate::model::id::ApplicationId;

/// A builder for the underlying [`Http`] client that performs requests to Discord's HTTP API.
///
/// If you do not need a bot token or a proxy, you can use [`Http::new`] instead.
#[must_use]
pub struct HttpBuilder {
    client: Option<Client>,
    token: Option<SecretString>,
    proxy: Option<Url>,
    timeout: Duration,
}

impl HttpBuilder {
    /// Construct a new builder to call methods on for the HTTP construction.
    pub fn new() -> Self {
        Self {
            client: None,
            token: None,
            proxy: None,
            timeout: constants::HTTP_TIMEOUT,
        }
    }

    /// Sets the bot token. Only command registration needs it; interaction follow-ups are
    /// authorized by the interaction token.
    pub fn token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    /// Sets the [`reqwest::Client`]. If one isn't provided, a default one will be used.
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Sets the proxy that Discord HTTP API requests will be passed to. This is mainly intended
    /// for pointing the client at a local test server.
    ///
    /// Every request that would go to `https://discord.com/` is sent to the proxy instead, with
    /// the rest of the path kept as is.
    pub fn proxy(mut self, proxy: Url) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Sets the upper bound on every request, including the time spent reading the body.
    /// Defaults to [`constants::HTTP_TIMEOUT`].
    ///
    /// It is applied per request, so it holds for a client given through [`Self::client`] too.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use the given configuration to build the `Http` client.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Request`] if the default [`reqwest::Client`] cannot be built.
    pub fn build(self) -> Result<Http> {
        let client = match self.client {
            Some(client) => client,
            None => configure_client_backend(Client::builder())
                .timeout(self.timeout)
                .build()
                .map_err(HttpError::from)?,
        };

        Ok(Http {
            client: Arc::new(client),
            token: self.token,
            proxy: self.proxy,
            timeout: self.timeout,
        })
    }
}

impl Default for HttpBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn configure_client_backend(builder: reqwest::ClientBuilder) -> reqwest::ClientBuilder {
    builder.use_rustls_tls().user_agent(constants::USER_AGENT)
}

/// **Note**: For all member functions that return a [`Result`], the Error kind will be either
/// [`Error::Http`] or [`Error::Json`].
#[derive(Clone, Debug)]
pub struct Http {
    pub(crate) client: Arc<Client>,
    token: Option<SecretString>,
    proxy: Option<Url>,
    timeout: Duration,
}

impl Http {
    /// Builds an [`Http`] client without a bot token.
    ///
    /// # Errors
    ///
    /// See [`HttpBuilder::build`].
    pub fn new() -> Result<Self> {
        HttpBuilder::new().build()
    }

    /// The shared [`reqwest::Client`], so other outbound integrations reuse its connection pool.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Edits the initial interaction response.
    ///
    /// Refer to Discord's [docs] for Edit Webhook Message for field information.
    ///
    /// [docs]: https://discord.com/developers/docs/resources/webhook#edit-webhook-message
    #[instrument(skip(self, interaction_token, map))]
    pub async fn edit_original_interaction_response(
        &self,
        application_id: ApplicationId,
        interaction_token: &str,
        map: &EditInteractionResponse,
    ) -> Result<()> {
        let body = to_vec(map)?;

        self.wind(
            200,
            Request::new(
                Route::WebhookOriginalInteractionResponse {
                    application_id,
                    token: interaction_token,
                },
                LightMethod::Patch,
            )
            .body(Some(body)),
        )
        .await
    }

    /// Overwrites all global application commands with the given list.
    ///
    /// **Note**: Requires the bot token.
    #[instrument(skip(self, commands))]
    pub async fn create_global_commands(
        &self,
        application_id: ApplicationId,
        commands: &[CreateCommand],
    ) -> Result<Vec<Command>> {
        self.fire(
            Request::new(
                Route::Commands {
                    application_id,
                },
                LightMethod::Put,
            )
            .body(Some(to_vec(commands)?))
            .authorized(true),
        )
        .await
    }

    /// Downloads the bytes of an attachment from Discord's CDN.
    ///
    /// The CDN URL is signed, so no authorization is sent with it.
    #[instrument(skip(self, attachment), fields(attachment = %attachment.id))]
    pub async fn download_attachment(&self, attachment: &Attachment) -> Result<Vec<u8>> {
        let response = self.client.get(&attachment.url).timeout(self.timeout).send().await?;

        if !response.status().is_success() {
            let error = ErrorResponse::from_response(response, reqwest::Method::GET).await;
            return Err(Error::Http(HttpError::UnsuccessfulRequest(error)));
        }

        let bytes = response.bytes().await?;
        debug!(len = bytes.len(), "downloaded attachment");
        Ok(bytes.to_vec())
    }

    /// Fires off a request, deserializing the response reader via the given type bound.
    pub async fn fire<T: DeserializeOwned>(&self, req: Request<'_>) -> Result<T> {
        let response = self.request(req).await?;
        decode_resp(response).await
    }

    /// Performs a request and returns the raw reqwest Response. Use [`Self::fire`] to
    /// deserialize the response into some type.
    ///
    /// Non-success status codes are turned into [`HttpError::UnsuccessfulRequest`].
    #[instrument(skip(self, req))]
    pub async fn request(&self, req: Request<'_>) -> Result<ReqwestResponse> {
        let method = req.method.reqwest_method();
        let token = self.token.as_ref().map(|t| t.expose_secret().as_str());
        let response = req
            .build(&self.client, token, self.proxy.as_ref())?
            .timeout(self.timeout)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Error::Http(HttpError::UnsuccessfulRequest(
                ErrorResponse::from_response(response, method).await,
            )))
        }
    }

    /// Performs a request and then verifies that the response status code is equal to the
    /// expected value.
    ///
    /// This is a function that performs a light amount of work and returns an empty tuple, so
    /// it's called "self.wind" to denote that it's lightweight.
    pub(super) async fn wind(&self, expected: u16, req: Request<'_>) -> Result<()> {
        let method = req.method.reqwest_method();
        let response = self.request(req).await?;

        if response.status().as_u16() == expected {
            return Ok(());
        }

        debug!("Expected {}, got {}", expected, response.status());
        trace!("Unsuccessful response: {:?}", response);

        Err(Error::Http(HttpError::UnsuccessfulRequest(
            ErrorResponse::from_response(response, method).await,
        )))
    }
}

#[async_trait]
impl InteractionResponder for Http {
    async fn edit_original_interaction_response(
        &self,
        application_id: ApplicationId,
        interaction_token: &str,
        edit: &EditInteractionResponse,
    ) -> Result<()> {
        Http::edit_original_interaction_response(self, application_id, interaction_token, edit)
            .await
    }
}

#[async_trait]
impl AttachmentSource for Http {
    async fn download_attachment(&self, attachment: &Attachment) -> Result<Vec<u8>> {
        Http::download_attachment(self, attachment).await
    }
}
