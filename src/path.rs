//! Path descriptors and path text helpers

use std::fmt;

use crate::error::{Result, YangError};
use crate::leaf::LeafData;
use crate::node::Node;

/// A computed path plus the leaf data found at it. Never cached; build a new
/// one after mutating the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityPath {
    pub path: String,
    pub value_paths: Vec<(String, LeafData)>,
}

impl fmt::Display for EntityPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = self
            .value_paths
            .iter()
            .map(|(name, data)| format!("{}: {}", name, data))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{} ( {} )", self.path, values)
    }
}

/// Path of `node`: absolute when `ancestor` is `None`, relative to
/// `ancestor` otherwise.
pub fn get_entity_path(node: &Node, ancestor: Option<&Node>) -> Result<EntityPath> {
    let path = match ancestor {
        None => {
            if node.has_list_ancestor() && node.parent().is_none() {
                return Err(YangError::invalid_argument(format!(
                    "ancestor for entity cannot be empty as one of the ancestors is a list. Path: {}",
                    node.segment_path()
                )));
            }
            let absolute = node.absolute_path();
            if absolute.is_empty() {
                node.segment_path()
            } else {
                absolute
            }
        }
        Some(ancestor) => {
            if node.is_top_level() {
                return Err(YangError::invalid_argument(format!(
                    "ancestor has to be empty for top-level node. Path: {}",
                    node.segment_path()
                )));
            }
            get_relative_entity_path(node, ancestor)?
        }
    };
    Ok(EntityPath {
        path,
        value_paths: node.name_leaf_data(),
    })
}

/// Segment paths from just below `ancestor` down to `node`, joined by `/`
pub fn get_relative_entity_path(node: &Node, ancestor: &Node) -> Result<String> {
    let mut segments = vec![node.segment_path()];
    let mut current = node.parent();
    loop {
        match current {
            Some(parent) if parent.ptr_eq(ancestor) => break,
            Some(parent) => {
                segments.push(parent.segment_path());
                current = parent.parent();
            }
            None => {
                return Err(YangError::invalid_argument(
                    "parent is not in the ancestor hierarchy",
                ));
            }
        }
    }
    segments.reverse();
    Ok(segments.join("/"))
}

/// Split a path on `/`, ignoring separators inside key brackets
pub fn segmentalize(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for c in path.chars() {
        match (c, quote) {
            (q, Some(open)) if q == open => quote = None,
            (_, Some(_)) => {}
            ('\'' | '"', None) if depth > 0 => quote = Some(c),
            ('[', None) => depth += 1,
            (']', None) => depth = depth.saturating_sub(1),
            ('/', None) if depth == 0 => {
                segments.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    segments.push(current);
    segments
}

/// One path segment broken into name, key predicates and position
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Segment {
    pub name: String,
    /// `(key, value)` with quotes removed
    pub keys: Vec<(String, String)>,
    /// Positional index of a keyless list entry
    pub position: Option<u64>,
}

/// Parse `name[k='v'][k2="v2"]` or `name[3]`
pub fn parse_segment(segment: &str) -> Result<Segment> {
    let (name, mut rest) = match segment.find('[') {
        Some(i) => (&segment[..i], &segment[i..]),
        None => (segment, ""),
    };
    let mut parsed = Segment {
        name: name.to_string(),
        ..Default::default()
    };

    while !rest.is_empty() {
        let body = rest
            .strip_prefix('[')
            .ok_or_else(|| YangError::invalid_argument(format!("malformed segment '{}'", segment)))?;
        let end = predicate_end(body)
            .ok_or_else(|| YangError::invalid_argument(format!("unterminated predicate in '{}'", segment)))?;
        let predicate = &body[..end];
        rest = &body[end + 1..];

        match predicate.split_once('=') {
            Some((key, value)) => parsed
                .keys
                .push((key.trim().to_string(), unquote(value.trim()).to_string())),
            None => {
                let position = predicate.trim().parse().map_err(|_| {
                    YangError::invalid_argument(format!(
                        "bad position '{}' in '{}'",
                        predicate, segment
                    ))
                })?;
                parsed.position = Some(position);
            }
        }
    }
    Ok(parsed)
}

/// Index of the `]` closing a predicate, skipping quoted text
fn predicate_end(body: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in body.char_indices() {
        match (c, quote) {
            (q, Some(open)) if q == open => quote = None,
            (_, Some(_)) => {}
            ('\'' | '"', None) => quote = Some(c),
            (']', None) => return Some(i),
            _ => {}
        }
    }
    None
}

fn unquote(value: &str) -> &str {
    for q in ['\'', '"'] {
        if let Some(inner) = value.strip_prefix(q).and_then(|v| v.strip_suffix(q)) {
            return inner;
        }
    }
    value
}

/// Render a path in gNMI form: key quotes dropped, positions kept
pub fn format_xpath(path: &str) -> String {
    segmentalize(path)
        .iter()
        .map(|segment| match parse_segment(segment) {
            Ok(parsed) => {
                let mut out = parsed.name;
                for (key, value) in parsed.keys {
                    out.push_str(&format!("[{}={}]", key, value));
                }
                if let Some(position) = parsed.position {
                    out.push_str(&format!("[{}]", position));
                }
                out
            }
            Err(_) => segment.clone(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{GLOBAL_BLOCK, INTERFACE, INTERFACES, SEGMENT_ROUTING};

    #[test]
    fn test_segmentalize_keeps_bracketed_slashes() {
        let segments =
            segmentalize("openconfig-interfaces:interfaces/interface[name='1/1/c1/2']/config");
        assert_eq!(
            segments,
            vec![
                "openconfig-interfaces:interfaces",
                "interface[name='1/1/c1/2']",
                "config"
            ]
        );
        assert_eq!(segmentalize("a"), vec!["a"]);
    }

    #[test]
    fn test_parse_segment() {
        let seg = parse_segment("route[prefix='10.0.0.0/8'][next-hop=\"it's\"]").unwrap();
        assert_eq!(seg.name, "route");
        assert_eq!(
            seg.keys,
            vec![
                ("prefix".to_string(), "10.0.0.0/8".to_string()),
                ("next-hop".to_string(), "it's".to_string())
            ]
        );

        let positional = parse_segment("unit[2]").unwrap();
        assert_eq!(positional.position, Some(2));
        assert!(parse_segment("unit[two]").is_err());
        assert!(parse_segment("unit[name='x'").is_err());
    }

    #[test]
    fn test_format_xpath() {
        assert_eq!(
            format_xpath("openconfig-interfaces:interfaces/interface[name='1/1/c1/2']"),
            "openconfig-interfaces:interfaces/interface[name=1/1/c1/2]"
        );
        assert_eq!(format_xpath("a:b/unit[0]/c"), "a:b/unit[0]/c");
    }

    #[test]
    fn test_entity_path_absolute() {
        let block = Node::new(&GLOBAL_BLOCK);
        block.set_leaf("lower-bound", 20000u32).unwrap();

        let path = get_entity_path(&block, None).unwrap();
        assert_eq!(
            path.path,
            "Cisco-IOS-XR-um-segment-routing-cfg:segment-routing/global-block"
        );
        assert_eq!(path.value_paths.len(), 1);
        assert_eq!(
            path.to_string(),
            "Cisco-IOS-XR-um-segment-routing-cfg:segment-routing/global-block ( lower-bound: 20000 )"
        );
    }

    #[test]
    fn test_entity_path_relative() {
        let top = Node::new(&SEGMENT_ROUTING);
        let block = top.child_by_name("global-block", "").unwrap();

        let path = get_entity_path(&block, Some(&top)).unwrap();
        assert_eq!(path.path, "global-block");

        assert!(get_entity_path(&top, Some(&block)).is_err());

        let stranger = Node::new(&SEGMENT_ROUTING);
        assert!(get_entity_path(&block, Some(&stranger)).is_err());
    }

    #[test]
    fn test_entity_path_needs_ancestor_under_list() {
        let unit = Node::new(INTERFACE.children[1].schema);
        assert!(get_entity_path(&unit, None).is_err());

        let top = Node::new(&INTERFACES);
        let eth0 = top.child_by_name("interface", "").unwrap();
        eth0.set_leaf("name", "eth0").unwrap();
        let unit = eth0.child_by_name("unit", "").unwrap();
        assert_eq!(
            get_entity_path(&unit, Some(&top)).unwrap().path,
            "interface[name='eth0']/unit[0]"
        );
    }
}
