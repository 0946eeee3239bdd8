//! Form-layer rules and form → request conversion.
//!
//! These gates run before a request is built. The typed results
//! ([`RejectionReason`], [`CreateEventRequest`], ...) can only be obtained
//! through them, so a request that violates a rule cannot be sent.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::date::{parse_instant, to_iso_string};
use crate::error::ValidationError;
use crate::wire::{CreateEventRequest, LoginRequest, RegisterRequest, UpdateEventRequest};

pub const MIN_REJECTION_REASON: usize = 5;
pub const MIN_PASSWORD: usize = 6;
pub const MAX_PASSWORD: usize = 20;

fn chars(s: &str) -> usize {
    s.chars().count()
}

fn looks_like_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.starts_with('.')
        && domain.contains('.')
        && !domain.ends_with('.')
        && !s.chars().any(char::is_whitespace)
}

// ── Rejection reason ────────────────────────────────────────────────

/// A trimmed rejection reason of at least five characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RejectionReason(String);

impl RejectionReason {
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if chars(trimmed) < MIN_REJECTION_REASON {
            return Err(ValidationError::new(
                "rejectionReason",
                "O motivo da rejeição deve ter no mínimo 5 caracteres",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ── Login / register ────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, ValidationError> {
        if !looks_like_email(self.email.trim()) {
            return Err(ValidationError::new("email", "Email inválido"));
        }
        if chars(&self.password) < MIN_PASSWORD {
            return Err(ValidationError::new("password", "Senha deve ter no mínimo 6 caracteres"));
        }
        Ok(LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub accepted_terms: bool,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<RegisterRequest, ValidationError> {
        if chars(self.name.trim()) < 3 {
            return Err(ValidationError::new("name", "Nome deve ter no mínimo 3 caracteres"));
        }
        if !looks_like_email(self.email.trim()) {
            return Err(ValidationError::new("email", "Email inválido"));
        }
        let len = chars(&self.password);
        if len < MIN_PASSWORD {
            return Err(ValidationError::new("senha", "Senha deve ter no mínimo 6 caracteres"));
        }
        if len > MAX_PASSWORD {
            return Err(ValidationError::new("senha", "Senha deve ter no máximo 20 caracteres"));
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::new("confirmSenha", "As senhas não coincidem"));
        }
        if !self.accepted_terms {
            return Err(ValidationError::new("aceitoTermos", "Você deve aceitar os termos"));
        }
        Ok(RegisterRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

// ── Events ──────────────────────────────────────────────────────────

/// Event create/edit form in display terms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventForm {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "dataInicio")]
    pub start_date: String,
    #[serde(rename = "dataFim")]
    pub end_date: String,
    #[serde(rename = "localizacao")]
    pub location: String,
    #[serde(rename = "imagemUrl", default)]
    pub image_url: Option<String>,
    #[serde(rename = "requerInscricao", default)]
    pub requires_registration: bool,
}

fn check_image(url: Option<&str>) -> Result<(), ValidationError> {
    match url.map(str::trim).filter(|s| !s.is_empty()) {
        Some(u) if Url::parse(u).is_err() => Err(ValidationError::new("imagemUrl", "URL inválida")),
        _ => Ok(()),
    }
}

fn iso(field: &'static str, raw: &str, missing: &'static str) -> Result<String, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::new(field, missing));
    }
    parse_instant(raw)
        .map(|dt| to_iso_string(&dt))
        .ok_or(ValidationError::new(field, "Data inválida"))
}

impl EventForm {
    /// Check the form and build the create request.
    pub fn validate(&self) -> Result<CreateEventRequest, ValidationError> {
        if chars(self.title.trim()) < 3 {
            return Err(ValidationError::new("titulo", "Título deve ter no mínimo 3 caracteres"));
        }
        if chars(self.description.trim()) < 10 {
            return Err(ValidationError::new(
                "descricao",
                "Descrição deve ter no mínimo 10 caracteres",
            ));
        }
        if chars(self.location.trim()) < 3 {
            return Err(ValidationError::new("localizacao", "Localização é obrigatória"));
        }
        let start = iso("dataInicio", &self.start_date, "Data de início é obrigatória")?;
        let end = iso("dataFim", &self.end_date, "Data de término é obrigatória")?;
        ensure_end_after_start(&start, &end)?;
        check_image(self.image_url.as_deref())?;

        Ok(CreateEventRequest {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            location: self.location.trim().to_string(),
            start_date: start,
            end_date: end,
            image_url: self
                .image_url
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            requires_registration: self.requires_registration,
        })
    }
}

fn ensure_end_after_start(start: &str, end: &str) -> Result<(), ValidationError> {
    match (parse_instant(start), parse_instant(end)) {
        (Some(s), Some(e)) if e > s => Ok(()),
        _ => Err(ValidationError::new(
            "dataFim",
            "Data de término deve ser posterior à data de início",
        )),
    }
}

/// Partial edit. Empty text fields count as "unchanged".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventPatch {
    #[serde(rename = "titulo", default)]
    pub title: Option<String>,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "dataInicio", default)]
    pub start_date: Option<String>,
    #[serde(rename = "dataFim", default)]
    pub end_date: Option<String>,
    #[serde(rename = "localizacao", default)]
    pub location: Option<String>,
    /// `Some("")` clears the image.
    #[serde(rename = "imagemUrl", default)]
    pub image_url: Option<String>,
    #[serde(rename = "requerInscricao", default)]
    pub requires_registration: Option<bool>,
}

fn changed(v: &Option<String>) -> Option<String> {
    v.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl EventPatch {
    /// Build the partial update. When both dates are given the end must
    /// still come after the start.
    pub fn validate(&self) -> Result<UpdateEventRequest, ValidationError> {
        let start_date = match changed(&self.start_date) {
            Some(s) => Some(iso("dataInicio", &s, "Data de início é obrigatória")?),
            None => None,
        };
        let end_date = match changed(&self.end_date) {
            Some(s) => Some(iso("dataFim", &s, "Data de término é obrigatória")?),
            None => None,
        };
        if let (Some(s), Some(e)) = (&start_date, &end_date) {
            ensure_end_after_start(s, e)?;
        }
        check_image(self.image_url.as_deref())?;

        Ok(UpdateEventRequest {
            title: changed(&self.title),
            description: changed(&self.description),
            location: changed(&self.location),
            start_date,
            end_date,
            image_url: self.image_url.as_ref().map(|_| changed(&self.image_url)),
            requires_registration: self.requires_registration,
        })
    }
}
