//! A [Transport] that sends requests over HTTP with `reqwest`.

use reqwest::{Client, multipart::Form};

use crate::{
    Error,
    config::ClientConfig,
    transport::{
        PreparedRequest, RequestDescriptor, ResponseBody, ResponseKind, Transport,
        TransportError, prepare,
    },
};

/// Sends requests over HTTP.
///
/// Each request runs on its own task spawned with [tokio::task::spawn_local],
/// so completion callbacks run on the thread that called [Transport::send].
///
/// # Panics
///
/// [Transport::send] panics if it is not called from within a
/// [tokio::task::LocalSet].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport whose requests time out after
    /// `config.request_timeout`.
    ///
    /// # Errors
    /// Returns [Error::HttpClient] if the underlying client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|error| Error::HttpClient(error.to_string()))?;

        Ok(Self { client })
    }

    async fn execute(
        &self,
        request: PreparedRequest,
        response_kind: ResponseKind,
    ) -> Result<ResponseBody, TransportError> {
        let mut builder = self.client.request(request.method.into(), request.url);

        if let Some(fields) = request.form {
            let form = fields
                .into_iter()
                .fold(Form::new(), |form, (key, value)| form.text(key, value));
            builder = builder.multipart(form);
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(TransportError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_owned(),
            });
        }

        match response_kind {
            ResponseKind::Json => response
                .json::<serde_json::Value>()
                .await
                .map(ResponseBody::Json)
                .map_err(|error| TransportError::Decode(error.to_string())),
            ResponseKind::Text => response
                .text()
                .await
                .map(ResponseBody::Text)
                .map_err(|error| TransportError::Decode(error.to_string())),
        }
    }
}

impl Transport for HttpTransport {
    fn send(&self, descriptor: RequestDescriptor) {
        let RequestDescriptor {
            url,
            method,
            data,
            response_kind,
            on_complete,
        } = descriptor;

        tracing::debug!("sending {} {url}", method.as_str());

        let prepared = prepare(&url, method, data.as_ref());
        let transport = self.clone();

        tokio::task::spawn_local(async move {
            let result = match prepared {
                Ok(request) => transport.execute(request, response_kind).await,
                Err(error) => Err(error),
            };

            if let Err(error) = &result {
                tracing::warn!("{} {url} failed: {error}", method.as_str());
            }

            on_complete(result);
        });
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use axum::{
        Json, Router,
        extract::Multipart,
        http::StatusCode,
        routing::{get, put},
    };
    use serde_json::json;
    use tokio::task::LocalSet;

    use crate::{
        config::ClientConfig,
        params::Params,
        test_utils::serve,
        transport::{
            HttpTransport, Method, RequestDescriptor, ResponseBody, ResponseKind, Transport,
            TransportError,
        },
    };

    type Outcomes = Rc<RefCell<Vec<Result<ResponseBody, TransportError>>>>;

    fn test_router() -> Router {
        Router::new()
            .route("/json", get(|| async { Json(json!({ "success": true })) }))
            .route("/text", get(|| async { "plain text" }))
            .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
            .route(
                "/query",
                get(|uri: axum::http::Uri| async move {
                    uri.query().unwrap_or_default().to_owned()
                }),
            )
            .route("/form", put(echo_form))
    }

    async fn echo_form(mut multipart: Multipart) -> Json<Vec<(String, String)>> {
        let mut fields = Vec::new();
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap().to_owned();
            let value = field.text().await.unwrap();
            fields.push((name, value));
        }
        Json(fields)
    }

    fn descriptor(
        method: Method,
        url: String,
        data: Option<Params>,
        response_kind: ResponseKind,
        outcomes: &Outcomes,
    ) -> RequestDescriptor {
        let outcomes = outcomes.clone();
        RequestDescriptor {
            url,
            method,
            data,
            response_kind,
            on_complete: Box::new(move |result| outcomes.borrow_mut().push(result)),
        }
    }

    async fn send_and_wait(descriptor: RequestDescriptor) {
        let transport = HttpTransport::new(&ClientConfig::default()).unwrap();
        let local = LocalSet::new();
        local.run_until(async { transport.send(descriptor) }).await;
        local.await;
    }

    #[tokio::test]
    async fn delivers_parsed_json_once() {
        let base_url = serve(test_router()).await;
        let outcomes = Outcomes::default();

        send_and_wait(descriptor(
            Method::Get,
            format!("{base_url}/json"),
            None,
            ResponseKind::Json,
            &outcomes,
        ))
        .await;

        assert_eq!(
            *outcomes.borrow(),
            vec![Ok(ResponseBody::Json(json!({ "success": true })))]
        );
    }

    #[tokio::test]
    async fn delivers_text_when_asked_for_text() {
        let base_url = serve(test_router()).await;
        let outcomes = Outcomes::default();

        send_and_wait(descriptor(
            Method::Get,
            format!("{base_url}/text"),
            None,
            ResponseKind::Text,
            &outcomes,
        ))
        .await;

        assert_eq!(
            *outcomes.borrow(),
            vec![Ok(ResponseBody::Text("plain text".to_owned()))]
        );
    }

    #[tokio::test]
    async fn non_success_status_is_reported_as_status_text() {
        let base_url = serve(test_router()).await;
        let outcomes = Outcomes::default();

        send_and_wait(descriptor(
            Method::Get,
            format!("{base_url}/missing"),
            None,
            ResponseKind::Json,
            &outcomes,
        ))
        .await;

        assert_eq!(
            *outcomes.borrow(),
            vec![Err(TransportError::Status {
                code: 404,
                reason: "Not Found".to_owned()
            })]
        );
    }

    #[tokio::test]
    async fn get_data_arrives_as_query_string() {
        let base_url = serve(test_router()).await;
        let outcomes = Outcomes::default();

        send_and_wait(descriptor(
            Method::Get,
            format!("{base_url}/query"),
            Some(Params::new().with("account_id", 42).with("type", "income")),
            ResponseKind::Text,
            &outcomes,
        ))
        .await;

        assert_eq!(
            *outcomes.borrow(),
            vec![Ok(ResponseBody::Text("account_id=42&type=income".to_owned()))]
        );
    }

    #[tokio::test]
    async fn form_data_arrives_as_multipart_fields() {
        let base_url = serve(test_router()).await;
        let outcomes = Outcomes::default();

        send_and_wait(descriptor(
            Method::Put,
            format!("{base_url}/form"),
            Some(Params::new().with("name", "Coffee").with("sum", 3.5)),
            ResponseKind::Json,
            &outcomes,
        ))
        .await;

        assert_eq!(
            *outcomes.borrow(),
            vec![Ok(ResponseBody::Json(json!([["name", "Coffee"], ["sum", "3.5"]])))]
        );
    }

    #[tokio::test]
    async fn dispatch_failure_is_delivered_through_callback() {
        let outcomes = Outcomes::default();
        let transport = HttpTransport::new(&ClientConfig::default()).unwrap();
        let local = LocalSet::new();

        local
            .run_until(async {
                transport.send(descriptor(
                    Method::Delete,
                    "http://localhost/transaction".to_owned(),
                    None,
                    ResponseKind::Json,
                    &outcomes,
                ));
                // Nothing is delivered before `send` returns.
                assert!(outcomes.borrow().is_empty());
            })
            .await;
        local.await;

        assert_eq!(
            *outcomes.borrow(),
            vec![Err(TransportError::MissingFormData("DELETE"))]
        );
    }

    #[tokio::test]
    #[should_panic]
    async fn send_outside_local_set_panics() {
        let outcomes = Outcomes::default();
        let transport = HttpTransport::new(&ClientConfig::default()).unwrap();

        transport.send(descriptor(
            Method::Get,
            "http://127.0.0.1:9/account".to_owned(),
            None,
            ResponseKind::Json,
            &outcomes,
        ));
    }

    #[tokio::test]
    async fn unreachable_server_completes_with_request_error() {
        let outcomes = Outcomes::default();

        // Port 9 (discard) is reserved and nothing listens on it in the test environment.
        send_and_wait(descriptor(
            Method::Get,
            "http://127.0.0.1:9/account".to_owned(),
            None,
            ResponseKind::Json,
            &outcomes,
        ))
        .await;

        let outcomes = outcomes.borrow();
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(outcomes[0], Err(TransportError::Request(_))));
    }
}
