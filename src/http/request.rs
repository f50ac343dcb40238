use std::borrow::Cow;

use reqwest::header::{HeaderMap as Headers, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, RequestBuilder as ReqwestRequestBuilder, Url};
use tracing::instrument;

use super::routing::Route;
use super::{HttpError, LightMethod};
use crate::constants;
use crate::internal::prelude::*;

#[derive(Clone, Debug)]
#[must_use]
pub struct Request<'a> {
    pub(super) body: Option<Vec<u8>>,
    pub(super) headers: Option<Headers>,
    pub(super) method: LightMethod,
    pub(super) route: Route<'a>,
    pub(super) authorized: bool,
}

impl<'a> Request<'a> {
    pub fn new(route: Route<'a>, method: LightMethod) -> Self {
        Self {
            body: None,
            headers: None,
            method,
            route,
            authorized: false,
        }
    }

    pub fn body(mut self, body: Option<Vec<u8>>) -> Self {
        self.body = body;
        self
    }

    pub fn headers(mut self, headers: Option<Headers>) -> Self {
        self.headers = headers;
        self
    }

    /// Marks the request as one that must carry the bot token.
    pub fn authorized(mut self, authorized: bool) -> Self {
        self.authorized = authorized;
        self
    }

    #[instrument(skip(token))]
    pub fn build(
        self,
        client: &Client,
        token: Option<&str>,
        proxy: Option<&Url>,
    ) -> Result<ReqwestRequestBuilder, HttpError> {
        let mut path = self.route.path();

        if let Some(proxy) = proxy {
            path = Cow::Owned(path.replace("https://discord.com/", proxy.as_str()));
        }

        let mut builder = client.request(self.method.reqwest_method(), Url::parse(&path)?);

        let mut headers = Headers::with_capacity(4);
        headers.insert(USER_AGENT, HeaderValue::from_static(constants::USER_AGENT));

        if self.authorized {
            let token = token.ok_or(HttpError::MissingToken)?;
            headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bot {token}"))?);
        }

        // Discord will return a 400: Bad Request response if we set the content type header,
        // but don't give a body.
        if self.body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        if let Some(request_headers) = self.headers {
            headers.extend(request_headers);
        }

        if let Some(bytes) = self.body {
            builder = builder.body(bytes);
        }

        Ok(builder.headers(headers))
    }

    #[must_use]
    pub fn body_ref(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    #[must_use]
    pub fn route_ref(&self) -> &Route<'_> {
        &self.route
    }
}
