use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::LookupError;

/// Structured contents of a single `.proto` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProtoFile {
    syntax:   Option<String>,
    services: Vec<Service>,
    messages: BTreeMap<String, Message>,
}

impl ProtoFile {
    pub fn new(
        syntax:   Option<String>,
        services: Vec<Service>,
        messages: BTreeMap<String, Message>,
    ) -> Self {
        ProtoFile { syntax, services, messages }
    }

    /// Value of the `syntax = "...";` statement, if the file has one.
    pub fn syntax(&self) -> Option<&str> {
        self.syntax.as_deref()
    }

    /// Services in declaration order.
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn messages(&self) -> &BTreeMap<String, Message> {
        &self.messages
    }

    /// First service declared with `name`.
    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.name == name)
    }

    pub fn message(&self, name: &str) -> Option<&Message> {
        self.messages.get(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Service {
    name:    String,
    methods: Vec<Method>,
}

impl Service {
    pub fn new(name: impl Into<String>, methods: Vec<Method>) -> Self {
        Service { name: name.into(), methods }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Methods in declaration order.
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// An `rpc` inside a service.
///
/// Request and response hold copies of the messages they resolved to when
/// the file was compiled. A reference that did not resolve holds an empty
/// message carrying only the referenced name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Method {
    name:              String,
    request:           Message,
    request_streamed:  bool,
    response:          Message,
    response_streamed: bool,
}

impl Method {
    pub fn new(
        name:              impl Into<String>,
        request:           Message,
        request_streamed:  bool,
        response:          Message,
        response_streamed: bool,
    ) -> Self {
        Method {
            name: name.into(),
            request,
            request_streamed,
            response,
            response_streamed,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn request(&self) -> &Message {
        &self.request
    }

    pub fn is_request_streamed(&self) -> bool {
        self.request_streamed
    }

    pub fn response(&self) -> &Message {
        &self.response
    }

    pub fn is_response_streamed(&self) -> bool {
        self.response_streamed
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stream = |streamed: bool| if streamed { "stream " } else { "" };
        write!(
            f,
            "rpc {}({}{}) returns ({}{})",
            self.name,
            stream(self.request_streamed),
            self.request.name,
            stream(self.response_streamed),
            self.response.name,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Message {
    name:   String,
    fields: BTreeMap<String, Field>,
}

impl Message {
    pub fn new(name: impl Into<String>, fields: BTreeMap<String, Field>) -> Self {
        Message { name: name.into(), fields }
    }

    /// A message with no fields, used where a referenced type is unknown.
    pub fn empty(name: impl Into<String>) -> Self {
        Message::new(name, BTreeMap::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &BTreeMap<String, Field> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Result<&Field, LookupError> {
        self.fields.get(name).ok_or_else(|| LookupError::FieldNotFound {
            message: self.name.clone(),
            field:   name.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    name:      String,
    type_name: String,
    repeated:  bool,
    number:    i32,
}

impl Field {
    pub fn new(
        name:      impl Into<String>,
        type_name: impl Into<String>,
        repeated:  bool,
        number:    i32,
    ) -> Self {
        Field {
            name: name.into(),
            type_name: type_name.into(),
            repeated,
            number,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type as written; scalar and message types are not distinguished.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn is_repeated(&self) -> bool {
        self.repeated
    }

    pub fn number(&self) -> i32 {
        self.number
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.repeated {
            f.write_str("repeated ")?;
        }
        write!(f, "{} {} = {}", self.type_name, self.name, self.number)
    }
}
