use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One row of a client's request list as displayed, joined with the catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RequestView {
    pub solicitacao_id: i32,
    pub data_pedido: NaiveDate,
    pub numero_solicitacao: String,
    pub status: String,
    pub data_prevista: Option<NaiveDate>,
    pub servico_nome: String,
    pub servico_preco: f64,
}

/// One entry of a replacement list as submitted by the client.
///
/// Carries no owner: the owner of every stored row is the verified caller. Every field keeps
/// the textual form of whatever JSON scalar was sent (`2`, `"2"` and `"150.00"` all pass) and
/// storage casts it to the column type, so absent or malformed values are rejected by the
/// storage constraints inside the transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestItem {
    #[serde(default, deserialize_with = "scalar_text")]
    pub servico_id: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub data_pedido: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub numero_solicitacao: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub preco_cobrado: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub data_prevista: Option<String>,
}

/// `null` becomes `None`, strings are kept as-is, anything else is kept as its JSON text
fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}

/// Acknowledgement of a committed replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    pub client_id: i32,
    pub removed: u64,
    pub inserted: usize,
}
