//! Splits scene text into `name(parent){ body }` blocks.
//!
//! There is no grammar here: a header pattern locates the next block and a
//! brace-depth scan finds where its body ends, so nested `{ ... }` inside a
//! body (e.g. `logical:{ goal }`) stay part of that body.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)\s*\(([^)]+)\)\s*\{").expect("block header pattern"));

/// One block as it appears in the text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawBlock<'a> {
    /// Block identifier, e.g. `obj1` or `obj1Joint`.
    pub name: &'a str,
    /// Parent reference between the parentheses, e.g. `world`.
    pub parent: &'a str,
    /// Everything between the opening brace and its matching close brace.
    pub body: &'a str,
    /// Byte range of the whole block, header included.
    pub span: Range<usize>,
    /// `false` when the closing brace was never found and the body runs to
    /// the end of the text.
    pub terminated: bool,
}

/// Lazy iterator over the blocks of a scene text, in textual order.
///
/// Always terminates: every step advances past the block it returned, and an
/// unterminated block consumes the rest of the input.
#[derive(Clone, Debug)]
pub struct Blocks<'a> {
    text: &'a str,
    pos: usize,
}

/// Scans `text` for blocks.
pub fn blocks(text: &str) -> Blocks<'_> {
    Blocks { text, pos: 0 }
}

impl<'a> Iterator for Blocks<'a> {
    type Item = RawBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.text.len() {
            return None;
        }
        let caps = HEADER.captures_at(self.text, self.pos)?;
        let header = caps.get(0)?;
        let name = caps.get(1)?.as_str();
        let parent = caps.get(2)?.as_str().trim();

        let body_start = header.end();
        let (body_end, terminated) = match matching_brace(&self.text[body_start..]) {
            Some(offset) => (body_start + offset, true),
            None => (self.text.len(), false),
        };

        // Skip the closing brace itself.
        self.pos = if terminated { body_end + 1 } else { body_end };

        Some(RawBlock {
            name,
            parent,
            body: &self.text[body_start..body_end],
            span: header.start()..self.pos,
            terminated,
        })
    }
}

/// Offset of the brace closing an already-open block, scanning from depth 1.
fn matching_brace(rest: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (i, b) in rest.bytes().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_blocks_in_order() {
        let text = "Include: <base.g>\n\na (world){ x:1 }\nb(a) { y:2 }";
        let found: Vec<_> = blocks(text).collect();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "a");
        assert_eq!(found[0].parent, "world");
        assert_eq!(found[0].body, " x:1 ");
        assert_eq!(found[1].name, "b");
        assert_eq!(found[1].parent, "a");
        assert!(found.iter().all(|b| b.terminated));
    }

    #[test]
    fn nested_braces_stay_in_body() {
        let text = "g1 (floor){ shape:ssBox, logical:{goal}, contact:0 }\nnext(world){}";
        let found: Vec<_> = blocks(text).collect();
        assert_eq!(found[0].body, " shape:ssBox, logical:{goal}, contact:0 ");
        assert_eq!(found[1].name, "next");
        assert_eq!(found[1].body, "");
    }

    #[test]
    fn multiline_body() {
        let text = "ego(egoJoint) {\n    shape:ssCylinder,\n    joint:transXY\n}";
        let block = blocks(text).next().unwrap();
        assert!(block.body.contains("ssCylinder"));
        assert!(block.body.contains("transXY"));
        assert_eq!(block.span, 0..text.len());
    }

    #[test]
    fn unterminated_block_consumes_rest() {
        let text = "a(world){ shape:ssBox, logical:{ movable_o ";
        let mut iter = blocks(text);
        let block = iter.next().unwrap();
        assert!(!block.terminated);
        assert_eq!(block.body, " shape:ssBox, logical:{ movable_o ");
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn text_without_headers_yields_nothing() {
        assert_eq!(blocks("").count(), 0);
        assert_eq!(blocks("Include: <x.g>\n}}}{{{").count(), 0);
    }
}
