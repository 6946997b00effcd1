use std::time::Duration;

use log::debug;
use reqwest::{
    blocking::{
        multipart::{Form, Part},
        RequestBuilder,
    },
    Method,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::model::{ProductCreateRequest, ProductEditRequest, ProductId};

use super::{
    error::HttpError,
    models::{ProductDetails, ProductPage, ProductParams, ProductSummary, SecretRequest},
    ProductCatalog,
};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Заголовок, по которому АПИ узнаёт продавца.
const IDENTIFIER_HEADER: &str = "identifier";

/// Внутренний клиент.
struct InnerClient {
    client: reqwest::blocking::Client,
    base_url: String,
    identifier: String,
}

impl InnerClient {
    /// Создаёт новый инстанс внутреннего клиента.
    fn new(base_url: &str, identifier: &str) -> Result<Self, HttpError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(5))
            .connect_timeout(Duration::from_secs(5))
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            identifier: identifier.to_owned(),
        })
    }

    fn get<R: DeserializeOwned>(&self, api_method: &str) -> Result<R, HttpError> {
        let body = self.execute(self.request(Method::GET, api_method))?;

        Ok(serde_json::from_str(&body)?)
    }

    fn get_text(&self, api_method: &str) -> Result<String, HttpError> {
        self.execute(self.request(Method::GET, api_method))
    }

    fn send_json<B: Serialize, R: DeserializeOwned>(
        &self,
        http_method: Method,
        api_method: &str,
        payload: &B,
    ) -> Result<R, HttpError> {
        let body = self.send_json_text(http_method, api_method, payload)?;

        Ok(serde_json::from_str(&body)?)
    }

    fn send_json_text<B: Serialize>(
        &self,
        http_method: Method,
        api_method: &str,
        payload: &B,
    ) -> Result<String, HttpError> {
        self.execute(self.request(http_method, api_method).json(payload))
    }

    fn send_multipart<R: DeserializeOwned>(
        &self,
        api_method: &str,
        form: Form,
    ) -> Result<R, HttpError> {
        let body = self.execute(self.request(Method::POST, api_method).multipart(form))?;

        Ok(serde_json::from_str(&body)?)
    }

    fn delete(&self, api_method: &str) -> Result<String, HttpError> {
        self.execute(self.request(Method::DELETE, api_method))
    }

    fn request(&self, http_method: Method, api_method: &str) -> RequestBuilder {
        let url = self.build_url(api_method);

        debug!("Запрос в АПИ: {} {}", http_method, url);

        self.client
            .request(http_method, url)
            .header(IDENTIFIER_HEADER, &self.identifier)
    }

    fn execute(&self, req_builder: RequestBuilder) -> Result<String, HttpError> {
        let resp = req_builder.send()?;

        let status = resp.status();
        let url = resp.url().to_string();
        let body = resp.text()?;

        debug!("Ответ на {}: {} {}", url, status, body);

        if !status.is_success() {
            return Err(HttpError::Status { status, body });
        }

        Ok(body)
    }

    fn build_url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method.trim_start_matches('/'))
    }
}

/// Клиент к АПИ каталога товаров.
pub struct MarketClient {
    client: InnerClient,
}

impl MarketClient {
    pub fn new(base_url: &str, identifier: &str) -> Result<Self, HttpError> {
        Ok(Self {
            client: InnerClient::new(base_url, identifier)?,
        })
    }

    /// Проверяет что сервер доступен.
    pub fn health_check(&self) -> Result<(), HttpError> {
        let body = self.client.get_text("/healthChecker")?;

        debug!("Сервер ответил на проверку: {}", body.trim());

        Ok(())
    }

    pub fn list_products(&self, page_no: u32, items_per_page: u32) -> Result<ProductPage, HttpError> {
        self.client.get(&products_page_path(page_no, items_per_page))
    }
}

impl ProductCatalog for MarketClient {
    fn fetch_product(&self, id: ProductId) -> Result<ProductDetails, HttpError> {
        self.client.get(&product_path(id))
    }

    fn create_product(&self, request: &ProductCreateRequest<'_>) -> Result<ProductSummary, HttpError> {
        let form = multipart_form(request)?;

        debug!(
            "Регистрируем товар {:?} с {} изображениями",
            request.fields.name,
            request.images.len()
        );

        self.client.send_multipart("/api/products", form)
    }

    fn update_product(
        &self,
        id: ProductId,
        request: &ProductEditRequest,
    ) -> Result<ProductSummary, HttpError> {
        let params = ProductParams::from(request);

        self.client.send_json(Method::PATCH, &product_path(id), &params)
    }

    /// Удаление происходит в два шага: сначала по секрету продавца
    /// запрашивается секрет товара, затем товар удаляется по нему.
    fn delete_product(&self, id: ProductId, secret: &str) -> Result<(), HttpError> {
        let product_secret =
            self.client
                .send_json_text(Method::POST, &product_secret_path(id), &SecretRequest { secret })?;

        self.client.delete(&product_delete_path(id, &product_secret))?;

        Ok(())
    }
}

fn products_page_path(page_no: u32, items_per_page: u32) -> String {
    format!(
        "/api/products?page_no={}&items_per_page={}",
        page_no, items_per_page
    )
}

fn product_path(id: ProductId) -> String {
    format!("/api/products/{}", id)
}

fn product_secret_path(id: ProductId) -> String {
    format!("/api/products/{}/secret", id)
}

/// Секрет товара сервер отдаёт текстом, иногда с переводом строки.
fn product_delete_path(id: ProductId, product_secret: &str) -> String {
    format!("/api/products/{}/{}", id, product_secret.trim())
}

fn multipart_form(request: &ProductCreateRequest<'_>) -> Result<Form, HttpError> {
    let params = serde_json::to_string(&ProductParams::from(&request.fields))?;

    let mut form = Form::new().part("params", Part::text(params).mime_str("application/json")?);

    for image in request.images {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(image.mime_type())?;

        form = form.part("images", part);
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use std::{
        io::{BufRead, BufReader, Read, Write},
        net::TcpListener,
        thread,
    };

    use super::*;

    /// Отвечает на запросы по очереди заданными телами и возвращает
    /// полученные запросы в виде "METHOD path identifier body".
    fn serve(responses: Vec<(u16, &'static str)>) -> (String, thread::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let mut seen = Vec::new();

            for (status, answer) in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(stream.try_clone().unwrap());

                let mut request_line = String::new();
                reader.read_line(&mut request_line).unwrap();

                let mut length = 0;
                let mut identifier = String::new();
                loop {
                    let mut line = String::new();
                    reader.read_line(&mut line).unwrap();
                    if line == "\r\n" {
                        break;
                    }
                    if let Some((name, value)) = line.split_once(':') {
                        if name.eq_ignore_ascii_case("content-length") {
                            length = value.trim().parse().unwrap();
                        }
                        if name.eq_ignore_ascii_case(IDENTIFIER_HEADER) {
                            identifier = value.trim().to_owned();
                        }
                    }
                }

                let mut payload = vec![0; length];
                reader.read_exact(&mut payload).unwrap();

                write!(
                    stream,
                    "HTTP/1.1 {} X\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    answer.len(),
                    answer
                )
                .unwrap();

                let mut parts = request_line.split_whitespace();
                seen.push(format!(
                    "{} {} {} {}",
                    parts.next().unwrap_or_default(),
                    parts.next().unwrap_or_default(),
                    identifier,
                    String::from_utf8_lossy(&payload)
                ));
            }

            seen
        });

        (base_url, handle)
    }

    fn local_client(base_url: &str) -> MarketClient {
        MarketClient {
            client: InnerClient {
                client: reqwest::blocking::Client::builder().no_proxy().build().unwrap(),
                base_url: base_url.to_owned(),
                identifier: "vendor".into(),
            },
        }
    }

    #[test]
    fn paths() {
        let id = ProductId::new(522);

        assert_eq!(
            products_page_path(2, 20),
            "/api/products?page_no=2&items_per_page=20"
        );
        assert_eq!(product_path(id), "/api/products/522");
        assert_eq!(product_secret_path(id), "/api/products/522/secret");
        assert_eq!(
            product_delete_path(id, " 1d3a6c5e-token\n"),
            "/api/products/522/1d3a6c5e-token"
        );
    }

    #[test]
    fn delete_asks_for_product_secret_first() {
        let (base_url, server) = serve(vec![(200, "1d3a6c5e-token\n"), (200, "{}")]);
        let client = local_client(&base_url);

        client.delete_product(ProductId::new(522), "password").unwrap();

        let seen = server.join().unwrap();
        assert_eq!(
            seen,
            vec![
                r#"POST /api/products/522/secret vendor {"secret":"password"}"#.to_owned(),
                "DELETE /api/products/522/1d3a6c5e-token vendor ".to_owned(),
            ]
        );
    }

    const SUMMARY: &str = r#"{"id":522,"vendor_id":29,"name":"Mug","thumbnail":"","currency":"KRW","price":15,"bargain_price":15,"discounted_price":0,"stock":4,"created_at":"2022-01-18T00:00:00.00","issued_at":"2022-01-18T00:00:00.00"}"#;

    #[test]
    fn update_sends_patch_with_params() {
        use crate::model::{Currency, ProductFields};
        use rust_decimal::Decimal;

        let (base_url, server) = serve(vec![(200, SUMMARY)]);
        let client = local_client(&base_url);
        let request = ProductFields {
            name: "Mug".into(),
            description: "Blue mug".into(),
            price: Decimal::new(15, 0),
            currency: Currency::Krw,
            discounted_price: Some(Decimal::ZERO),
            stock: None,
            secret: "password".into(),
        };

        let summary = client.update_product(ProductId::new(522), &request).unwrap();

        assert_eq!(summary.price, Decimal::new(15, 0));
        let seen = server.join().unwrap();
        assert!(seen[0].starts_with("PATCH /api/products/522 vendor {"));
        assert!(seen[0].contains(r#""discounted_price":0.0"#));
        assert!(!seen[0].contains("stock"));
    }

    #[test]
    fn list_passes_paging() {
        let page = r#"{"page_no":3,"items_per_page":10,"total_count":0,"offset":20,"limit":30,"last_page":1,"has_next":false,"has_prev":true,"pages":[]}"#;
        let (base_url, server) = serve(vec![(200, page)]);
        let client = local_client(&base_url);

        let page = client.list_products(3, 10).unwrap();

        assert_eq!(page.page_no, 3);
        assert_eq!(
            server.join().unwrap(),
            vec!["GET /api/products?page_no=3&items_per_page=10 vendor ".to_owned()]
        );
    }

    #[test]
    fn delete_stops_when_secret_is_rejected() {
        let (base_url, server) = serve(vec![(401, "wrong secret")]);
        let client = local_client(&base_url);

        let err = client.delete_product(ProductId::new(522), "nope").unwrap_err();

        assert!(matches!(
            err,
            HttpError::Status { status, ref body } if status.as_u16() == 401 && body == "wrong secret"
        ));
        assert_eq!(server.join().unwrap().len(), 1);
    }

    #[test]
    fn build_url_joins_slashes() {
        let client = InnerClient::new("https://market.example.com/", "id").unwrap();

        assert_eq!(
            client.build_url("/api/products/1"),
            "https://market.example.com/api/products/1"
        );
        assert_eq!(
            client.build_url("healthChecker"),
            "https://market.example.com/healthChecker"
        );
    }

    #[test]
    fn multipart_form_accepts_request() {
        use crate::model::{Currency, ImageAttachment, ProductFields};
        use rust_decimal::Decimal;

        let images = vec![ImageAttachment::new("a.jpg", vec![0xFF, 0xD8])];
        let request = ProductCreateRequest {
            fields: ProductFields {
                name: "Mug".into(),
                description: "Blue mug".into(),
                price: Decimal::new(125, 1),
                currency: Currency::Krw,
                discounted_price: None,
                stock: None,
                secret: "password".into(),
            },
            images: &images,
        };

        assert!(multipart_form(&request).is_ok());
    }
}
