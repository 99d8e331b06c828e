/// Test utilities and helpers for Vecta testing
///
/// Two transports stand in for a server: `RecordingTransport` records
/// requests and replays canned responses, `InMemoryServer` implements enough
/// of the REST surface to run full object journeys without a network.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Map, Value as Json};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;
use vecta_client::{Client, Transport};
use vecta_core::{Error, Kind, Method, RestRequest, Result};

/// Install a test-friendly subscriber once. Honors `RUST_LOG`, defaults to
/// `warn`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Transport that records every request and answers from a queue
#[derive(Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<RestRequest>>,
    responses: Mutex<VecDeque<Result<Json>>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a response. Once the queue is empty every request gets `Null`.
    pub fn respond(&self, response: Result<Json>) {
        self.responses.lock().push_back(response);
    }

    pub fn respond_json(&self, body: Json) {
        self.respond(Ok(body));
    }

    pub fn requests(&self) -> Vec<RestRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn last_request(&self) -> Option<RestRequest> {
        self.requests.lock().last().cloned()
    }

    pub fn client(self: &Arc<Self>) -> Client {
        Client::with_transport(self.clone())
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: RestRequest) -> Result<Json> {
        debug!(request = %request, "recording request");
        self.requests.lock().push(request);
        self.responses.lock().pop_front().unwrap_or(Ok(Json::Null))
    }
}

#[derive(Default)]
struct ServerState {
    objects: HashMap<Kind, Vec<Json>>,
    classes: HashMap<Kind, Vec<Json>>,
}

/// In-memory stand-in for a server's REST surface
///
/// Objects are kept per kind in insertion order. Query requests are answered
/// from a queue of canned responses (`{"data": {}}` once it runs dry).
#[derive(Default)]
pub struct InMemoryServer {
    state: Mutex<ServerState>,
    requests: Mutex<Vec<RestRequest>>,
    queries: Mutex<VecDeque<Json>>,
}

impl InMemoryServer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn client(self: &Arc<Self>) -> Client {
        Client::with_transport(self.clone())
    }

    /// Queue the body returned for the next query request.
    pub fn respond_to_query(&self, body: Json) {
        self.queries.lock().push_back(body);
    }

    pub fn requests(&self) -> Vec<RestRequest> {
        self.requests.lock().clone()
    }

    /// Number of stored objects of `kind`.
    pub fn object_count(&self, kind: Kind) -> usize {
        self.state.lock().objects.get(&kind).map(Vec::len).unwrap_or(0)
    }

    /// A stored object, as the server holds it.
    pub fn object(&self, kind: Kind, id: &str) -> Option<Json> {
        self.state
            .lock()
            .objects
            .get(&kind)
            .and_then(|objects| objects.iter().find(|o| o["id"] == id).cloned())
    }

    fn handle(&self, request: &RestRequest) -> Result<Json> {
        let (path, query) = match request.path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (request.path.as_str(), None),
        };
        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        let body = request.body.clone().unwrap_or(Json::Null);

        match (request.method, segments.as_slice()) {
            (Method::Post, ["graphql"]) => Ok(self
                .queries
                .lock()
                .pop_front()
                .unwrap_or_else(|| json!({"data": {}}))),

            (Method::Get, ["schema"]) => Ok(self.schema_document()),
            (Method::Post, ["schema", kind]) => {
                let kind = parse_kind(kind, path)?;
                self.state.lock().classes.entry(kind).or_default().push(body.clone());
                Ok(body)
            }
            (Method::Delete, ["schema", kind, class_name]) => {
                let kind = parse_kind(kind, path)?;
                let mut state = self.state.lock();
                let classes = state.classes.entry(kind).or_default();
                let before = classes.len();
                classes.retain(|c| c["class"] != *class_name);
                if classes.len() == before {
                    return Err(not_found(path));
                }
                Ok(Json::Null)
            }

            (Method::Post, [kind]) => self.create(parse_kind(kind, path)?, body),
            (Method::Get, [kind]) => {
                let kind = parse_kind(kind, path)?;
                let limit = param(query, "limit").and_then(|l| l.parse::<usize>().ok());
                Ok(self.list(kind, limit, param(query, "include")))
            }
            (Method::Post, [kind, "validate"]) => {
                parse_kind(kind, path)?;
                let has_class = body["class"].as_str().map(|c| !c.is_empty()).unwrap_or(false);
                if has_class {
                    Ok(Json::Null)
                } else {
                    Err(server_error(422, "class is required"))
                }
            }
            (Method::Get, [kind, id]) => {
                let kind = parse_kind(kind, path)?;
                let object = self.object(kind, id).ok_or_else(|| not_found(path))?;
                Ok(enrich(object, param(query, "include")))
            }
            (Method::Put, [kind, id]) => {
                let kind = parse_kind(kind, path)?;
                self.with_object(kind, id, path, |object| {
                    *object = body.clone();
                    object["id"] = json!(id);
                    object.clone()
                })
            }
            (Method::Patch, [kind, id]) => {
                let kind = parse_kind(kind, path)?;
                self.with_object(kind, id, path, |object| {
                    if let (Some(target), Some(patch)) =
                        (object["schema"].as_object_mut(), body["schema"].as_object())
                    {
                        for (key, value) in patch {
                            target.insert(key.clone(), value.clone());
                        }
                    }
                    Json::Null
                })
            }
            (Method::Delete, [kind, id]) => {
                let kind = parse_kind(kind, path)?;
                let mut state = self.state.lock();
                let objects = state.objects.entry(kind).or_default();
                let before = objects.len();
                objects.retain(|o| o["id"] != *id);
                if objects.len() == before {
                    return Err(not_found(path));
                }
                Ok(Json::Null)
            }

            (method, [kind, id, "references", property]) => {
                let kind = parse_kind(kind, path)?;
                self.with_object(kind, id, path, |object| {
                    let refs = &mut object["schema"][*property];
                    match method {
                        Method::Post => {
                            if !refs.is_array() {
                                *refs = json!([]);
                            }
                            if let Some(list) = refs.as_array_mut() {
                                list.push(body.clone());
                            }
                        }
                        Method::Put => *refs = body.clone(),
                        Method::Delete => {
                            if let Some(list) = refs.as_array_mut() {
                                list.retain(|r| *r != body);
                            }
                        }
                        _ => {}
                    }
                    Json::Null
                })
            }

            _ => Err(not_found(path)),
        }
    }

    fn create(&self, kind: Kind, mut body: Json) -> Result<Json> {
        let object = body
            .as_object_mut()
            .ok_or_else(|| server_error(422, "object body must be a JSON object"))?;
        object
            .entry("id")
            .or_insert_with(|| json!(Uuid::new_v4().to_string()));

        let mut state = self.state.lock();
        let objects = state.objects.entry(kind).or_default();
        if objects.iter().any(|o| o["id"] == body["id"]) {
            return Err(server_error(422, "id already exists"));
        }
        objects.push(body.clone());
        Ok(body)
    }

    fn list(&self, kind: Kind, limit: Option<usize>, include: Option<&str>) -> Json {
        let state = self.state.lock();
        let objects = state.objects.get(&kind).cloned().unwrap_or_default();
        let total = objects.len();

        let listed: Vec<Json> = objects
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|o| enrich(o, include))
            .collect();

        let mut response = Map::new();
        response.insert(kind.list_key().to_string(), Json::Array(listed));
        response.insert("totalResults".to_string(), json!(total));
        Json::Object(response)
    }

    fn with_object<T>(
        &self,
        kind: Kind,
        id: &str,
        path: &str,
        f: impl FnOnce(&mut Json) -> T,
    ) -> Result<T> {
        let mut state = self.state.lock();
        let object = state
            .objects
            .entry(kind)
            .or_default()
            .iter_mut()
            .find(|o| o["id"] == id)
            .ok_or_else(|| not_found(path))?;
        Ok(f(object))
    }

    fn schema_document(&self) -> Json {
        let state = self.state.lock();
        let mut document = Map::new();
        for kind in Kind::ALL {
            let classes = state.classes.get(&kind).cloned().unwrap_or_default();
            document.insert(kind.as_str().to_string(), json!({ "classes": classes }));
        }
        Json::Object(document)
    }
}

#[async_trait]
impl Transport for InMemoryServer {
    async fn send(&self, request: RestRequest) -> Result<Json> {
        debug!(request = %request, "in-memory server handling request");
        self.requests.lock().push(request.clone());
        self.handle(&request)
    }
}

fn parse_kind(segment: &str, path: &str) -> Result<Kind> {
    segment.parse().map_err(|_| not_found(path))
}

fn param<'a>(query: Option<&'a str>, name: &str) -> Option<&'a str> {
    query?
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Attach synthetic enrichment fields for the requested include tokens.
/// Classification is only present on classified objects, so it is never added.
fn enrich(mut object: Json, include: Option<&str>) -> Json {
    for token in include.unwrap_or_default().split(',') {
        let (key, value) = match token {
            "vector" => ("_vector", json!([0.12, -0.4, 0.33, 0.9, 0.05, -0.27, 0.61, 0.18, -0.72, 0.44, 0.08])),
            "interpretation" => ("_interpretation", json!({"source": []})),
            "nearestNeighbors" => ("_nearestNeighbors", json!({"neighbors": []})),
            "featureProjection" => ("_featureProjection", json!({"vector": [0.5, -0.5]})),
            _ => continue,
        };
        object[key] = value;
    }
    object
}

fn server_error(status: u16, message: &str) -> Error {
    Error::Server {
        status,
        body: json!({"error": [{"message": message}]}),
    }
}

fn not_found(path: &str) -> Error {
    server_error(404, &format!("no resource at {}", path))
}

/// Deterministic article properties for tests and benchmarks
pub struct ArticleGenerator {
    counter: u64,
}

impl ArticleGenerator {
    pub fn new() -> Self {
        Self { counter: 0 }
    }

    /// Next article's properties: title, url and wordCount.
    pub fn next_schema(&mut self) -> Json {
        let n = self.counter;
        self.counter += 1;
        json!({
            "title": format!("Article {}", n),
            "url": format!("https://news.example.com/articles/{}", n),
            "wordCount": 100 + n * 10,
        })
    }

    pub fn fresh_id() -> String {
        Uuid::new_v4().to_string()
    }
}

impl Default for ArticleGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Assert that `err` is a usage error carrying exactly `expected`, in order.
pub fn assert_usage_messages(err: &Error, expected: &[&str]) {
    match err {
        Error::Usage(usage) => {
            let got: Vec<&str> = usage.messages().iter().map(String::as_str).collect();
            assert_eq!(got, expected);
        }
        other => panic!("Expected usage error, got {:?}", other),
    }
}
