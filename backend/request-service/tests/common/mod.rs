//! In-memory stores and app builders shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use crypto_core::JwtCodec;
use request_service::db::{ClientStore, HealthProbe, RequestStore, ServiceCatalog, StoreError};
use request_service::models::{
    CatalogService, Client, ClientSummary, NewCatalogService, NewClient, RequestItem, RequestView,
};
use request_service::AppState;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const TEST_SECRET: &str = "integration-test-secret";

#[derive(Debug, Clone)]
struct StoredRequest {
    id: i32,
    servico_id: i32,
    data_pedido: NaiveDate,
    numero_solicitacao: String,
    status: String,
    preco_cobrado: f64,
    data_prevista: Option<NaiveDate>,
}

#[derive(Default)]
struct RequestTables {
    next_id: i32,
    rows: HashMap<i32, Vec<StoredRequest>>,
}

/// Request store that mirrors the PostgreSQL constraints and commits a replacement only
/// when every insert succeeds.
pub struct MemoryRequestStore {
    catalog: Arc<MemoryCatalog>,
    tables: Mutex<RequestTables>,
    fail_on_insert: Mutex<Option<usize>>,
    unavailable: AtomicBool,
    committed_replacements: AtomicUsize,
}

impl MemoryRequestStore {
    pub fn new(catalog: Arc<MemoryCatalog>) -> Self {
        Self {
            catalog,
            tables: Mutex::new(RequestTables {
                next_id: 1,
                rows: HashMap::new(),
            }),
            fail_on_insert: Mutex::new(None),
            unavailable: AtomicBool::new(false),
            committed_replacements: AtomicUsize::new(0),
        }
    }

    /// Make the `n`th insert (1-based) of the next replacement fail
    pub fn fail_on_insert(&self, n: usize) {
        *self.fail_on_insert.lock().unwrap() = Some(n);
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn committed_replacements(&self) -> usize {
        self.committed_replacements.load(Ordering::SeqCst)
    }

    fn stage(&self, id: i32, item: &RequestItem) -> Result<StoredRequest, StoreError> {
        let violation = |what: &str| StoreError::ConstraintViolation(what.to_string());
        let required = |value: &Option<String>, column: &str| {
            value
                .clone()
                .ok_or_else(|| violation(&format!("{} is null", column)))
        };

        let servico_id: i32 = required(&item.servico_id, "servico_id")?
            .trim()
            .parse()
            .map_err(|_| violation("invalid input syntax for type integer"))?;
        if self.catalog.get(servico_id).is_none() {
            return Err(violation("servico_id violates foreign key"));
        }

        let data_pedido = parse_date(&required(&item.data_pedido, "data_pedido")?)
            .ok_or_else(|| violation("invalid date"))?;

        let data_prevista = match item.data_prevista.as_deref() {
            Some(d) => Some(parse_date(d).ok_or_else(|| violation("invalid date"))?),
            None => None,
        };

        let preco_cobrado: f64 = required(&item.preco_cobrado, "preco_cobrado")?
            .trim()
            .parse()
            .map_err(|_| violation("invalid input syntax for type numeric"))?;

        Ok(StoredRequest {
            id,
            servico_id,
            data_pedido,
            numero_solicitacao: required(&item.numero_solicitacao, "numero_solicitacao")?,
            status: required(&item.status, "status")?,
            preco_cobrado,
            data_prevista,
        })
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[async_trait]
impl RequestStore for MemoryRequestStore {
    async fn list_by_owner(&self, client_id: i32) -> Result<Vec<RequestView>, StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".into()));
        }

        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<StoredRequest> =
            tables.rows.get(&client_id).cloned().unwrap_or_default();
        rows.sort_by_key(|r| (r.data_pedido, r.id));

        Ok(rows
            .into_iter()
            .map(|r| {
                let service = self.catalog.get(r.servico_id).unwrap();
                RequestView {
                    solicitacao_id: r.id,
                    data_pedido: r.data_pedido,
                    numero_solicitacao: r.numero_solicitacao,
                    status: r.status,
                    data_prevista: r.data_prevista,
                    servico_nome: service.nome,
                    servico_preco: service.preco,
                }
            })
            .collect())
    }

    async fn replace_all_for_owner(
        &self,
        client_id: i32,
        items: &[RequestItem],
    ) -> Result<u64, StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".into()));
        }

        let fail_on = self.fail_on_insert.lock().unwrap().take();
        let mut tables = self.tables.lock().unwrap();

        let mut next_id = tables.next_id;
        let mut staged = Vec::with_capacity(items.len());
        for (n, item) in items.iter().enumerate() {
            if fail_on == Some(n + 1) {
                return Err(StoreError::Unavailable("connection lost during insert".into()));
            }
            staged.push(self.stage(next_id, item)?);
            next_id += 1;
        }

        let removed = tables
            .rows
            .insert(client_id, staged)
            .map(|old| old.len() as u64)
            .unwrap_or(0);
        tables.next_id = next_id;
        self.committed_replacements.fetch_add(1, Ordering::SeqCst);

        Ok(removed)
    }
}

#[derive(Default)]
pub struct MemoryCatalog {
    services: Mutex<Vec<CatalogService>>,
}

impl MemoryCatalog {
    pub fn seeded() -> Self {
        let catalog = Self::default();
        {
            let mut services = catalog.services.lock().unwrap();
            services.push(CatalogService {
                id: 1,
                nome: "Suporte Técnico Remoto".into(),
                preco: 100.0,
                prazo_dias: 1,
            });
            services.push(CatalogService {
                id: 2,
                nome: "Backup em Nuvem".into(),
                preco: 150.0,
                prazo_dias: 2,
            });
        }
        catalog
    }

    pub fn get(&self, id: i32) -> Option<CatalogService> {
        self.services
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }
}

#[async_trait]
impl ServiceCatalog for MemoryCatalog {
    async fn list(&self) -> Result<Vec<CatalogService>, StoreError> {
        let mut services = self.services.lock().unwrap().clone();
        services.sort_by(|a, b| a.nome.cmp(&b.nome));
        Ok(services)
    }

    async fn create(&self, service: NewCatalogService) -> Result<CatalogService, StoreError> {
        let mut services = self.services.lock().unwrap();
        let created = CatalogService {
            id: services.iter().map(|s| s.id).max().unwrap_or(0) + 1,
            nome: service.nome,
            preco: service.preco,
            prazo_dias: service.prazo_dias,
        };
        services.push(created.clone());
        Ok(created)
    }
}

#[derive(Default)]
pub struct MemoryClientStore {
    clients: Mutex<Vec<Client>>,
}

impl MemoryClientStore {
    pub fn password_hash_of(&self, email: &str) -> Option<String> {
        self.clients
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.email == email)
            .map(|c| c.senha_hash.clone())
    }
}

#[async_trait]
impl ClientStore for MemoryClientStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Client>, StoreError> {
        Ok(self
            .clients
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.email == email)
            .cloned())
    }

    async fn create(&self, client: NewClient) -> Result<ClientSummary, StoreError> {
        let mut clients = self.clients.lock().unwrap();
        if clients.iter().any(|c| c.email == client.email) {
            return Err(StoreError::UniqueViolation {
                constraint: "cliente_email_key".into(),
            });
        }
        if clients.iter().any(|c| c.cpf == client.cpf) {
            return Err(StoreError::UniqueViolation {
                constraint: "cliente_cpf_key".into(),
            });
        }

        let stored = Client {
            id: clients.len() as i32 + 1,
            email: client.email,
            senha_hash: client.senha_hash,
            nome: client.nome,
            cpf: client.cpf,
        };
        clients.push(stored.clone());

        Ok(ClientSummary {
            id: stored.id,
            email: stored.email,
            nome: stored.nome,
        })
    }

    async fn update_password_hash(
        &self,
        email: &str,
        senha_hash: &str,
    ) -> Result<bool, StoreError> {
        let mut clients = self.clients.lock().unwrap();
        match clients.iter_mut().find(|c| c.email == email) {
            Some(client) => {
                client.senha_hash = senha_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

pub struct StaticHealth(pub bool);

#[async_trait]
impl HealthProbe for StaticHealth {
    async fn ping(&self) -> Result<(), StoreError> {
        if self.0 {
            Ok(())
        } else {
            Err(StoreError::Unavailable("connection refused".into()))
        }
    }
}

/// Application state over in-memory stores, with handles kept for assertions
pub struct TestContext {
    pub state: AppState,
    pub requests: Arc<MemoryRequestStore>,
    pub clients: Arc<MemoryClientStore>,
    pub catalog: Arc<MemoryCatalog>,
    pub codec: Arc<JwtCodec>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_health(true)
    }

    pub fn with_health(healthy: bool) -> Self {
        let codec = Arc::new(JwtCodec::new(TEST_SECRET, Duration::hours(24)).unwrap());
        let catalog = Arc::new(MemoryCatalog::seeded());
        let requests = Arc::new(MemoryRequestStore::new(catalog.clone()));
        let clients = Arc::new(MemoryClientStore::default());

        let state = AppState::from_stores(
            requests.clone(),
            clients.clone(),
            catalog.clone(),
            Arc::new(StaticHealth(healthy)),
            codec.clone(),
        );

        Self {
            state,
            requests,
            clients,
            catalog,
            codec,
        }
    }

    /// `Authorization` header value for a client
    pub fn bearer(&self, client_id: i32) -> String {
        let token = self
            .codec
            .issue(client_id, &format!("client{}@example.com", client_id))
            .unwrap();
        format!("Bearer {}", token)
    }
}

pub fn item(servico_id: i32, data_pedido: &str, numero: &str) -> RequestItem {
    RequestItem {
        servico_id: Some(servico_id.to_string()),
        data_pedido: Some(data_pedido.to_string()),
        numero_solicitacao: Some(numero.to_string()),
        status: Some("EM ELABORAÇÃO".to_string()),
        preco_cobrado: Some("100.00".to_string()),
        data_prevista: Some("2025-01-15".to_string()),
    }
}
