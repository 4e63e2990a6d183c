//! Reply rendering.

use gifbox_types::Value;

use super::request::Header;

/// Status codes the server can answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// 200
    Ok,
    /// 201
    Created,
    /// 202
    Accepted,
    /// 204
    NoContent,
    /// 300
    MultipleChoices,
    /// 301
    MovedPermanently,
    /// 302
    MovedTemporarily,
    /// 304
    NotModified,
    /// 400
    BadRequest,
    /// 401
    Unauthorized,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 500
    InternalServerError,
    /// 501
    NotImplemented,
    /// 502
    BadGateway,
    /// 503
    ServiceUnavailable,
}

impl StatusCode {
    /// Numeric status code.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Created => 201,
            Self::Accepted => 202,
            Self::NoContent => 204,
            Self::MultipleChoices => 300,
            Self::MovedPermanently => 301,
            Self::MovedTemporarily => 302,
            Self::NotModified => 304,
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::InternalServerError => 500,
            Self::NotImplemented => 501,
            Self::BadGateway => 502,
            Self::ServiceUnavailable => 503,
        }
    }

    /// Reason phrase used on the status line.
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Created => "Created",
            Self::Accepted => "Accepted",
            Self::NoContent => "No Content",
            Self::MultipleChoices => "Multiple Choices",
            Self::MovedPermanently => "Moved Permanently",
            Self::MovedTemporarily => "Moved Temporarily",
            Self::NotModified => "Not Modified",
            Self::BadRequest => "Bad Request",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not Found",
            Self::InternalServerError => "Internal Server Error",
            Self::NotImplemented => "Not Implemented",
            Self::BadGateway => "Bad Gateway",
            Self::ServiceUnavailable => "Service Unavailable",
        }
    }

    fn stock_body(self) -> String {
        match self {
            Self::Ok => String::new(),
            // The heading omits "No".
            Self::NoContent => html_page("No Content", "204 Content"),
            _ => html_page(
                self.reason(),
                &format!("{} {}", self.code(), self.reason()),
            ),
        }
    }
}

fn html_page(title: &str, heading: &str) -> String {
    format!("<html><head><title>{title}</title></head><body><h1>{heading}</h1></body></html>")
}

/// A fully rendered reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    status: StatusCode,
    headers: Vec<Header>,
    content: String,
}

impl Reply {
    /// Builds the fixed HTML reply for `status`.
    #[must_use]
    pub fn stock(status: StatusCode) -> Self {
        Self::with_content(status, status.stock_body(), "text/html")
    }

    /// Builds a 200 reply whose body lists `values`, each followed by a space.
    #[must_use]
    pub fn text(values: &[Value]) -> Self {
        let content = values
            .iter()
            .map(|value| format!("{value} "))
            .collect::<String>();
        Self::with_content(StatusCode::Ok, content, "text")
    }

    fn with_content(status: StatusCode, content: String, content_type: &str) -> Self {
        let headers = vec![
            Header::new("Content-Length", content.len().to_string()),
            Header::new("Content-Type", content_type),
        ];
        Self {
            status,
            headers,
            content,
        }
    }

    /// Reply status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Headers in the order they will be written.
    #[must_use]
    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// Body text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Serialises the status line, headers, blank line and body.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut wire = format!(
            "HTTP/1.0 {} {}\r\n",
            self.status.code(),
            self.status.reason()
        );
        for header in &self.headers {
            wire.push_str(&header.name);
            wire.push_str(": ");
            wire.push_str(&header.value);
            wire.push_str("\r\n");
        }
        wire.push_str("\r\n");
        wire.push_str(&self.content);
        wire.into_bytes()
    }
}
