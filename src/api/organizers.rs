use reqwest::{
    Method,
    multipart::{Form, Part},
};
use serde::Serialize;

use super::{ApiClient, ApiError, segment};
use crate::models::{
    ApplicationFilters, ApplicationsListResponse, DataResponse, MessageResponse,
    OrganizationType, OrganizerApplication, OrganizersListResponse, PageParams, SubmitApplication,
};

/// Document
///
/// A supporting file attached to an organizer application.
#[derive(Debug, Clone)]
pub struct Document {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Rejection<'a> {
    rejection_reason: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Revocation<'a> {
    revocation_reason: &'a str,
}

fn organization_type_field(kind: OrganizationType) -> &'static str {
    match kind {
        OrganizationType::Nonprofit => "nonprofit",
        OrganizationType::Charity => "charity",
        OrganizationType::Individual => "individual",
        OrganizationType::Business => "business",
        OrganizationType::Other => "other",
    }
}

fn application_form(
    application: &SubmitApplication,
    documents: Vec<Document>,
) -> Result<Form, ApiError> {
    let mut form = Form::new()
        .text("organizationName", application.organization_name.clone())
        .text("description", application.description.clone());

    let optional = [
        ("contactEmail", &application.contact_email),
        ("phoneNumber", &application.phone_number),
        ("website", &application.website),
    ];
    for (name, value) in optional {
        if let Some(value) = value {
            form = form.text(name, value.clone());
        }
    }
    if let Some(kind) = application.organization_type {
        form = form.text("organizationType", organization_type_field(kind));
    }

    for document in documents {
        let part = Part::bytes(document.bytes)
            .file_name(document.file_name)
            .mime_str(&document.content_type)
            .map_err(ApiError::InvalidRequest)?;
        form = form.part("documents", part);
    }

    Ok(form)
}

impl ApiClient {
    /// apply_as_organizer
    ///
    /// Submits a donor's request to become an organizer as a multipart form, with
    /// every document sent as a `documents` part.
    pub async fn apply_as_organizer(
        &self,
        application: &SubmitApplication,
        documents: Vec<Document>,
    ) -> Result<DataResponse<OrganizerApplication>, ApiError> {
        let path = "/api/organizer/apply";
        let form = application_form(application, documents)?;
        self.send(path, self.request(Method::POST, path).multipart(form))
            .await
    }

    pub async fn my_applications(&self) -> Result<ApplicationsListResponse, ApiError> {
        self.get("/api/organizer/my-applications").await
    }

    pub async fn list_applications(
        &self,
        filters: &ApplicationFilters,
    ) -> Result<ApplicationsListResponse, ApiError> {
        self.get_with("/api/organizer/applications", filters).await
    }

    pub async fn application(
        &self,
        id: &str,
    ) -> Result<DataResponse<OrganizerApplication>, ApiError> {
        self.get(&format!("/api/organizer/applications/{}", segment(id)))
            .await
    }

    pub async fn approve_application(
        &self,
        id: &str,
    ) -> Result<DataResponse<OrganizerApplication>, ApiError> {
        self.send_empty(
            Method::PATCH,
            &format!("/api/organizer/applications/{}/approve", segment(id)),
        )
        .await
    }

    pub async fn reject_application(
        &self,
        id: &str,
        rejection_reason: &str,
    ) -> Result<DataResponse<OrganizerApplication>, ApiError> {
        self.send_json(
            Method::PATCH,
            &format!("/api/organizer/applications/{}/reject", segment(id)),
            &Rejection { rejection_reason },
        )
        .await
    }

    pub async fn list_organizers(
        &self,
        page: PageParams,
    ) -> Result<OrganizersListResponse, ApiError> {
        self.get_with("/api/organizer", &page).await
    }

    pub async fn revoke_organizer(
        &self,
        id: &str,
        revocation_reason: &str,
    ) -> Result<MessageResponse, ApiError> {
        self.send_json(
            Method::PATCH,
            &format!("/api/organizer/{}/revoke", segment(id)),
            &Revocation { revocation_reason },
        )
        .await
    }

    pub async fn reinstate_organizer(&self, id: &str) -> Result<MessageResponse, ApiError> {
        self.send_empty(
            Method::PATCH,
            &format!("/api/organizer/{}/reinstate", segment(id)),
        )
        .await
    }
}
