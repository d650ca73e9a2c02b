// Label endpoint families.
//
// Generic labels and shipping labels expose the same operations under
// different roots (`/labels`, `/shipping-labels`). The category is a type
// parameter so each family only accepts its own creation payload.

use reqwest::Method;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::client::{ApiClient, decode};
use crate::error::Error;
use crate::models::{
    BulkDeleteRequest, BulkDeleteResult, EntityId, Label, NewLabel, NewShippingLabel,
    PreviewImage, PrintableLabel,
};

/// Runtime tag for a label category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKind {
    Generic,
    Shipping,
}

/// A family of label endpoints sharing one URL root.
pub trait LabelCategory: Send + Sync + 'static {
    /// Creation payload accepted by `POST /{root}/generate`.
    type Draft: Serialize + Send + Sync;

    /// URL root, without slashes.
    const ROOT: &'static str;

    const KIND: LabelKind;
}

/// Generic product labels under `/labels`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Generic;

impl LabelCategory for Generic {
    type Draft = NewLabel;
    const ROOT: &'static str = "labels";
    const KIND: LabelKind = LabelKind::Generic;
}

/// Shipping labels under `/shipping-labels`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Shipping;

impl LabelCategory for Shipping {
    type Draft = NewShippingLabel;
    const ROOT: &'static str = "shipping-labels";
    const KIND: LabelKind = LabelKind::Shipping;
}

impl ApiClient {
    /// `POST /{root}/generate`.
    pub async fn create_label<C: LabelCategory>(&self, draft: &C::Draft) -> Result<Label, Error> {
        let url = self.url(&format!("{}/generate", C::ROOT))?;
        let builder = self.request(Method::POST, url)?.json(draft);
        self.send_json(builder).await
    }

    /// `GET /{root}`. A `null` or empty body is an empty list.
    pub async fn list_labels<C: LabelCategory>(&self) -> Result<Vec<Label>, Error> {
        let url = self.url(C::ROOT)?;
        let builder = self.request(Method::GET, url)?;
        let resp = self.send(builder).await?;
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        let value: Option<Vec<Label>> = decode(&body)?;
        Ok(value.unwrap_or_default())
    }

    /// `GET /{root}/print/{id}`.
    pub async fn print_label<C: LabelCategory>(&self, id: &EntityId) -> Result<PrintableLabel, Error> {
        let url = self.url(&format!("{}/print/{id}", C::ROOT))?;
        let builder = self.request(Method::GET, url)?;
        self.send_json(builder).await
    }

    /// Token-bearing preview URL: `/{root}/preview/{id}?token=...`.
    ///
    /// Image consumers often cannot attach headers, so the token travels
    /// as a query parameter.
    pub fn preview_url<C: LabelCategory>(&self, id: &EntityId) -> Result<Url, Error> {
        let token = self.token()?.ok_or(Error::NotAuthenticated)?;
        let mut url = self.url(&format!("{}/preview/{id}", C::ROOT))?;
        url.query_pairs_mut()
            .append_pair("token", token.expose_secret());
        Ok(url)
    }

    /// Download the preview image through [`preview_url`](Self::preview_url).
    pub async fn fetch_preview<C: LabelCategory>(&self, id: &EntityId) -> Result<PreviewImage, Error> {
        let url = self.preview_url::<C>(id)?;
        let builder = self.request(Method::GET, url.clone())?;
        let resp = self.send(builder).await?;
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = resp.bytes().await.map_err(|e| self.transport_error(e))?;
        debug!(len = bytes.len(), "preview downloaded");
        Ok(PreviewImage {
            url,
            content_type,
            bytes,
        })
    }

    /// `DELETE /{root}/{id}`.
    pub async fn delete_label<C: LabelCategory>(&self, id: &EntityId) -> Result<(), Error> {
        let url = self.url(&format!("{}/{id}", C::ROOT))?;
        let builder = self.request(Method::DELETE, url)?;
        self.send_empty(builder).await
    }

    /// `DELETE /{root}/bulk` with `{ids}`.
    ///
    /// An empty body yields an empty result. Any JSON body is kept, see
    /// [`BulkDeleteResult::from_value`]; a body that is not JSON is an error.
    pub async fn bulk_delete_labels<C: LabelCategory>(
        &self,
        ids: &[EntityId],
    ) -> Result<BulkDeleteResult, Error> {
        let url = self.url(&format!("{}/bulk", C::ROOT))?;
        let builder = self
            .request(Method::DELETE, url)?
            .json(&BulkDeleteRequest { ids });
        let resp = self.send(builder).await?;
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;
        if body.trim().is_empty() {
            return Ok(BulkDeleteResult::default());
        }
        let value: Value = decode(&body)?;
        Ok(BulkDeleteResult::from_value(value))
    }
}
