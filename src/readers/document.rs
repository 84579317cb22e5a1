use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, PrefixDeclaration, ResolveResult};
use quick_xml::NsReader;

use crate::errors::ParseError;


/// An element of a parsed document with its namespace resolved to a URI
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub namespace: Option<String>,
    pub name: String,
    /// Direct text content of the element, not including descendants
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.name == name && self.namespace.as_deref() == Some(namespace)
    }

    /// Child elements in the namespace, regardless of their name
    pub fn children_in<'a, 'b>(&'a self, namespace: &'b str) -> impl Iterator<Item = &'a Element> + 'b
    where
        'a: 'b,
    {
        self.children
            .iter()
            .filter(move |child| child.namespace.as_deref() == Some(namespace))
    }

    pub fn children<'a, 'b>(&'a self, namespace: &'b str, name: &'b str) -> impl Iterator<Item = &'a Element> + 'b
    where
        'a: 'b,
    {
        self.children.iter().filter(move |child| child.is(namespace, name))
    }

    pub fn child(&self, namespace: &str, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.is(namespace, name))
    }

    /// Follow the first matching child at each step of the path
    pub fn path(&self, namespace: &str, path: &[&str]) -> Option<&Element> {
        path.iter().try_fold(self, |element, name| element.child(namespace, name))
    }

    /// Every element matching the path, following all matching children at each step
    pub fn path_all(&self, namespace: &str, path: &[&str]) -> Vec<&Element> {
        let mut matches = vec![self];
        for name in path {
            matches = matches
                .into_iter()
                .flat_map(|element| element.children(namespace, name))
                .collect();
        }
        matches
    }

    /// Pre-order walk of this element and all of its descendants
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}


pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.children.iter().rev());
        Some(element)
    }
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
    /// Namespace prefixes declared on the root element
    namespaces: HashMap<String, String>,
}

impl Document {
    pub fn parse(bytes: &[u8]) -> Result<Document, ParseError> {
        let mut reader = NsReader::from_reader(bytes);
        let decoder = reader.decoder();

        let mut root = None;
        let mut namespaces = HashMap::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut buf = Vec::new();

        loop {
            let (resolved, event) = reader.read_resolved_event_into(&mut buf)?;
            let namespace = namespace_uri(resolved)?;

            match event {
                Event::Start(e) => {
                    if stack.is_empty() {
                        if root.is_some() {
                            return Err(ParseError::MultipleRoots);
                        }
                        namespaces = declarations(&e, decoder)?;
                    }
                    stack.push(new_element(namespace, &e)?);
                }
                Event::Empty(e) => {
                    if stack.is_empty() {
                        if root.is_some() {
                            return Err(ParseError::MultipleRoots);
                        }
                        namespaces = declarations(&e, decoder)?;
                    }
                    let element = new_element(namespace, &e)?;
                    attach(&mut stack, &mut root, element);
                }
                Event::End(_) => {
                    let element = stack.pop().ok_or(ParseError::UnmatchedEnd)?;
                    attach(&mut stack, &mut root, element);
                }
                Event::Text(txt) => {
                    let text = txt.unescape()?;
                    match stack.last_mut() {
                        Some(parent) => parent.text.push_str(&text),
                        None if !text.trim().is_empty() => return Err(ParseError::TextOutsideRoot),
                        None => {}
                    }
                }
                Event::CData(data) => {
                    let text = std::str::from_utf8(&data)?;
                    match stack.last_mut() {
                        Some(parent) => parent.text.push_str(text),
                        None => return Err(ParseError::TextOutsideRoot),
                    }
                }
                Event::Eof => break,
                // declarations, comments, processing instructions and doctypes carry no data
                _ => {}
            }

            buf.clear();
        }

        if !stack.is_empty() {
            return Err(ParseError::Unclosed(stack.len()));
        }

        let root = root.ok_or(ParseError::Empty)?;
        Ok(Document { root, namespaces })
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// The namespace URI bound to a prefix on the root element.
    /// The default namespace is available under the empty prefix.
    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.namespaces.get(prefix).map(String::as_str)
    }

    /// Search the whole document for the first element with the name
    pub fn find(&self, namespace: &str, name: &str) -> Option<&Element> {
        self.root.descendants().find(|element| element.is(namespace, name))
    }
}


fn namespace_uri(resolved: ResolveResult) -> Result<Option<String>, ParseError> {
    match resolved {
        ResolveResult::Bound(Namespace(uri)) => Ok(Some(std::str::from_utf8(uri)?.to_string())),
        // an undeclared prefix leaves the element unqualified
        ResolveResult::Unbound | ResolveResult::Unknown(_) => Ok(None),
    }
}

fn new_element(namespace: Option<String>, event: &BytesStart) -> Result<Element, ParseError> {
    let name = std::str::from_utf8(event.local_name().into_inner())?;
    Ok(Element {
        namespace,
        name: name.to_string(),
        ..Default::default()
    })
}

fn declarations(event: &BytesStart, decoder: quick_xml::Decoder) -> Result<HashMap<String, String>, ParseError> {
    let mut namespaces = HashMap::new();

    for attr in event.attributes() {
        let attr = attr?;
        let prefix = match attr.key.as_namespace_binding() {
            Some(PrefixDeclaration::Default) => String::new(),
            Some(PrefixDeclaration::Named(prefix)) => std::str::from_utf8(prefix)?.to_string(),
            None => continue,
        };
        let uri = attr.decode_and_unescape_value(decoder)?;
        namespaces.insert(prefix, uri.into_owned());
    }

    Ok(namespaces)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    const NS_A: &str = "urn:test:a";
    const NS_B: &str = "urn:test:b";

    fn parse(xml: &str) -> Result<Document, ParseError> {
        Document::parse(xml.as_bytes())
    }

    #[test]
    fn reads_root_namespace_table() {
        let doc = parse(r#"<a:root xmlns:a="urn:test:a" xmlns:b="urn:test:b" xmlns="urn:test:default"/>"#).unwrap();
        assert_eq!(doc.namespace("a"), Some(NS_A));
        assert_eq!(doc.namespace("b"), Some(NS_B));
        assert_eq!(doc.namespace(""), Some("urn:test:default"));
        assert_eq!(doc.namespace("c"), None);
    }

    #[test]
    fn resolves_element_namespaces() {
        let doc = parse(r#"<a:root xmlns:a="urn:test:a"><b:item xmlns:b="urn:test:b">x</b:item><plain/></a:root>"#).unwrap();
        let root = doc.root();
        assert!(root.is(NS_A, "root"));
        assert_eq!(root.child(NS_B, "item").map(|e| e.text.as_str()), Some("x"));
        assert_eq!(root.children[1].namespace, None);
        // declared below the root so not part of the document table
        assert_eq!(doc.namespace("b"), None);
    }

    #[test]
    fn unknown_prefix_is_unqualified() {
        let doc = parse(r#"<root><x:item>1</x:item></root>"#).unwrap();
        let item = &doc.root().children[0];
        assert_eq!(item.name, "item");
        assert_eq!(item.namespace, None);
    }

    #[test]
    fn keeps_direct_text_unescaped() {
        let doc = parse(r#"<r xmlns:a="urn:test:a"><a:t> Acme &amp; Co <a:n>1</a:n><![CDATA[<x>]]></a:t></r>"#).unwrap();
        let text = doc.root().child(NS_A, "t").unwrap();
        assert_eq!(text.text, " Acme & Co <x>");
        assert_eq!(text.child(NS_A, "n").unwrap().text, "1");
    }

    #[test]
    fn follows_paths() {
        let doc = parse(
            r#"<r xmlns:a="urn:test:a">
                <a:g><a:v>1</a:v><a:v>2</a:v></a:g>
                <a:g><a:v>3</a:v></a:g>
            </r>"#,
        )
        .unwrap();
        let root = doc.root();
        assert_eq!(root.path(NS_A, &["g", "v"]).unwrap().text, "1");
        assert!(root.path(NS_A, &["g", "missing"]).is_none());
        assert!(root.path(NS_B, &["g"]).is_none());

        let all: Vec<&str> = root
            .path_all(NS_A, &["g", "v"])
            .into_iter()
            .map(|e| e.text.as_str())
            .collect();
        assert_eq!(all, vec!["1", "2", "3"]);
    }

    #[test]
    fn lookups_outlive_their_name_arguments() {
        let doc = parse(r#"<a:r xmlns:a="urn:test:a"><a:g><a:v>1</a:v></a:g></a:r>"#).unwrap();

        let found = {
            let namespace = String::from(NS_A);
            let names = vec![String::from("g"), String::from("v")];
            let path: Vec<&str> = names.iter().map(String::as_str).collect();
            (
                doc.root().child(&namespace, "g"),
                doc.root().path(&namespace, &path),
                doc.root().path_all(&namespace, &path),
                doc.root().children_in(&namespace).collect::<Vec<_>>(),
            )
        };

        assert_eq!(found.0.map(|e| e.name.as_str()), Some("g"));
        assert_eq!(found.1.map(|e| e.text.as_str()), Some("1"));
        assert_eq!(found.2.len(), 1);
        assert_eq!(found.3.len(), 1);
    }

    #[test]
    fn finds_anywhere_in_document_order() {
        let doc = parse(
            r#"<a:r xmlns:a="urn:test:a">
                <a:x><a:deep><a:e>first</a:e></a:deep></a:x>
                <a:e>second</a:e>
            </a:r>"#,
        )
        .unwrap();
        assert_eq!(doc.find(NS_A, "e").unwrap().text, "first");
        assert!(doc.find(NS_A, "r").is_some());
        assert!(doc.find(NS_B, "e").is_none());

        let names: Vec<&str> = doc.root().descendants().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["r", "x", "deep", "e", "e"]);
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(matches!(parse(""), Err(ParseError::Empty)));
        assert!(matches!(parse("<?xml version=\"1.0\"?>\n"), Err(ParseError::Empty)));
        assert!(matches!(parse("<a><b></a>"), Err(ParseError::Xml(_))));
        assert!(parse("<a><b>").is_err());
        assert!(matches!(parse("<a/><b/>"), Err(ParseError::MultipleRoots)));
        assert!(matches!(parse("not xml at all"), Err(ParseError::TextOutsideRoot)));
        assert!(Document::parse(b"<a>\xff\xfe</a>").is_err());
    }
}
