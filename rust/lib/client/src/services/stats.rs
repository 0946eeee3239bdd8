use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiError;

/// Admin dashboard aggregate. Every field defaults, so a backend that
/// omits a block still decodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminStats {
    pub total_inscritos: u64,
    pub total_eventos: u64,
    pub eventos_por_status: StatusCounts,
    pub total_usuarios_ativos: u64,
    pub total_usuarios: u64,
    pub total_promoters: u64,
    pub promoters_pendentes: u64,
    pub promoters_aprovados: u64,
    pub locais_mais_populares: Vec<PopularLocation>,
    pub taxa_aceitacao: AcceptanceRates,
    pub eventos_por_mes: Vec<MonthlyEvents>,
    pub inscricoes_por_mes: Vec<MonthlyRegistrations>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct StatusCounts {
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
    pub cancelled: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PopularLocation {
    pub localizacao: String,
    pub total_eventos: u64,
    pub total_inscritos: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcceptanceRates {
    pub eventos: Acceptance,
    pub promoters: Acceptance,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Acceptance {
    pub aprovados: u64,
    pub rejeitados: u64,
    /// Percentage, 0 to 100.
    pub taxa_aprovacao: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthlyEvents {
    pub mes: String,
    pub total: u64,
    pub aprovados: u64,
    pub pendentes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthlyRegistrations {
    pub mes: String,
    pub total: u64,
}

/// `/admin/stats` (admin only).
pub struct Stats<'a> {
    api: &'a ApiClient,
}

impl<'a> Stats<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn overview(&self) -> Result<AdminStats, ApiError> {
        let body = self.api.get("/admin/stats").await?;
        serde_json::from_value(body).map_err(|e| ApiError::Decode(format!("stats: {e}")))
    }

    // The breakdown endpoints have no fixed shape; callers get the JSON.

    pub async fn registrations(&self) -> Result<Value, ApiError> {
        self.api.get("/admin/stats/inscricoes").await
    }

    pub async fn events(&self) -> Result<Value, ApiError> {
        self.api.get("/admin/stats/eventos").await
    }

    pub async fn users(&self) -> Result<Value, ApiError> {
        self.api.get("/admin/stats/usuarios").await
    }
}
