//! Converts Orders API XML documents into a JSON tree.
//!
//! Each element becomes an object keyed by its children's local names. An element with no child elements becomes
//! its text (an empty string for `<Foo/>`). A child that repeats becomes an array, and a child that appears once is
//! left as a bare value, which is the shape `OneOrMany` accepts. Attributes and namespaces are dropped. The root
//! element itself is unwrapped, so `<ListOrdersResponse><ListOrdersResult>..` yields `{"ListOrdersResult": ..}`.
use quick_xml::{events::Event, Reader};
use serde_json::{Map, Value};

use crate::MwsApiError;

#[derive(Default)]
struct XmlNode {
    name: String,
    children: Map<String, Value>,
    text: String,
}

impl XmlNode {
    fn new(name: String) -> Self {
        Self { name, ..Default::default() }
    }

    fn add_child(&mut self, name: String, value: Value) {
        match self.children.get_mut(&name) {
            Some(Value::Array(list)) => list.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            },
            None => {
                self.children.insert(name, value);
            },
        }
    }

    fn into_value(self) -> Value {
        if self.children.is_empty() {
            Value::String(self.text)
        } else {
            Value::Object(self.children)
        }
    }
}

fn xml_error<E: std::fmt::Display>(reader: &Reader<&[u8]>, e: E) -> MwsApiError {
    MwsApiError::XmlError(format!("Invalid XML at position {}. {e}", reader.buffer_position()))
}

pub fn xml_to_json(xml: &str) -> Result<Value, MwsApiError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    // The bottom of the stack collects the root element
    let mut stack = vec![XmlNode::default()];
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                stack.push(XmlNode::new(name));
            },
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if let Some(parent) = stack.last_mut() {
                    parent.add_child(name, Value::String(String::new()));
                }
            },
            Ok(Event::Text(t)) => {
                let text = t.unescape().map_err(|e| xml_error(&reader, e))?;
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&text);
                }
            },
            Ok(Event::CData(c)) => {
                let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&text);
                }
            },
            Ok(Event::End(_)) => {
                if stack.len() < 2 {
                    return Err(xml_error(&reader, "Unexpected closing tag."));
                }
                if let Some(node) = stack.pop() {
                    let name = node.name.clone();
                    if let Some(parent) = stack.last_mut() {
                        parent.add_child(name, node.into_value());
                    }
                }
            },
            Ok(Event::Eof) => break,
            Ok(_) => {},
            Err(e) => return Err(xml_error(&reader, e)),
        }
    }
    if stack.len() != 1 {
        return Err(xml_error(&reader, "The document ended inside an element."));
    }
    stack
        .pop()
        .and_then(|holder| holder.children.into_iter().next())
        .map(|(_, root)| root)
        .ok_or_else(|| MwsApiError::XmlError("The document has no root element.".into()))
}
