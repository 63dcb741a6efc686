use std::collections::BTreeMap;

use relaysig_model::{ExtractionStage, StageWarning};
use tracing::warn;

use crate::blocks::block_identity;
use crate::context::ExtractContext;
use crate::error::Result;
use crate::tree::XmlNode;

/// Pretty-printed XML of every block and every configuration/header section.
///
/// Blocks are keyed by their identifier (`A1RADR`), other sections by tag. The
/// first element with a given key is kept. An element that cannot be rendered
/// is stored as `<KEY>...</KEY>` and reported in `failures`.
pub(crate) fn extract_raw_blocks(
    ctx: &ExtractContext<'_>,
    failures: &mut Vec<StageWarning>,
) -> BTreeMap<String, String> {
    collect_raw_blocks(ctx, failures, XmlNode::to_pretty_xml)
}

fn collect_raw_blocks(
    ctx: &ExtractContext<'_>,
    failures: &mut Vec<StageWarning>,
    render: impl Fn(&XmlNode) -> Result<String>,
) -> BTreeMap<String, String> {
    let mut blocks = BTreeMap::new();
    for flat in &ctx.nodes {
        let node = flat.node;
        let key = match block_identity(node) {
            Some((name, _)) => name,
            None => {
                let tag = node.tag.to_ascii_lowercase();
                if !(tag.contains("config") || tag.contains("header")) {
                    continue;
                }
                node.tag.clone()
            }
        };
        if blocks.contains_key(&key) {
            continue;
        }
        let xml = render(node).unwrap_or_else(|error| {
            warn!(block = %key, %error, "raw block not rendered");
            failures.push(StageWarning {
                stage: ExtractionStage::RawBlocks,
                message: format!("{key}: {error}"),
            });
            format!("<{key}>...</{key}>")
        });
        blocks.insert(key, xml);
    }
    blocks
}

/// Block identifiers in document order, without duplicates.
pub(crate) fn block_names(ctx: &ExtractContext<'_>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for flat in &ctx.nodes {
        if let Some((name, _)) = block_identity(flat.node)
            && !names.contains(&name)
        {
            names.push(name);
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::XrioError;
    use crate::tree::XmlDocument;

    #[test]
    fn unrenderable_block_gets_placeholder() {
        let doc = XmlDocument::parse(
            "<XRio><A1RADR><Ch>IL1</Ch></A1RADR><B1RBDR/><DeviceHeader/></XRio>",
        )
        .expect("parse");
        let ctx = ExtractContext::new(&doc);
        let mut failures = Vec::new();
        let blocks = collect_raw_blocks(&ctx, &mut failures, |node| {
            if node.tag == "B1RBDR" {
                Err(XrioError::Render {
                    tag: node.tag.clone(),
                    message: "broken".to_string(),
                })
            } else {
                node.to_pretty_xml()
            }
        });

        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks["B1RBDR"], "<B1RBDR>...</B1RBDR>");
        assert!(blocks["A1RADR"].contains("<Ch>IL1</Ch>"));
        assert!(blocks.contains_key("DeviceHeader"));
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].stage, ExtractionStage::RawBlocks);
        assert!(failures[0].message.starts_with("B1RBDR: "));
    }
}
