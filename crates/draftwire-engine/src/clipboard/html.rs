use html_escape::encode_text;

use crate::clipboard::HostSelection;
use crate::model::{BlockMap, BlockType, ContentBlock};

/// Host selection rendered directly from a block map.
///
/// Used where no platform selection exists (tests, the command line). List
/// items of the same kind are grouped into one `<ul>`/`<ol>`.
#[derive(Debug, Clone, Copy)]
pub struct BlockMapSelection<'a> {
    fragment: &'a BlockMap,
    delimiter: &'a str,
}

impl<'a> BlockMapSelection<'a> {
    pub fn new(fragment: &'a BlockMap) -> Self {
        Self::with_delimiter(fragment, "\n")
    }

    /// Plain text joins blocks with `delimiter`; an empty one means newline
    pub fn with_delimiter(fragment: &'a BlockMap, delimiter: &'a str) -> Self {
        let delimiter = if delimiter.is_empty() { "\n" } else { delimiter };
        Self {
            fragment,
            delimiter,
        }
    }
}

impl HostSelection for BlockMapSelection<'_> {
    fn plain_text(&self) -> String {
        self.fragment
            .blocks()
            .map(|block| block.text())
            .collect::<Vec<_>>()
            .join(self.delimiter)
    }

    fn html(&self) -> String {
        render_html(self.fragment)
    }
}

/// Render a fragment as HTML, escaping all text
pub fn render_html(fragment: &BlockMap) -> String {
    let mut html = String::new();
    let mut open_list: Option<&'static str> = None;

    for block in fragment.blocks() {
        let list_tag = match block.block_type() {
            BlockType::UnorderedListItem => Some("ul"),
            BlockType::OrderedListItem => Some("ol"),
            _ => None,
        };

        if open_list != list_tag {
            if let Some(tag) = open_list {
                html.push_str(&format!("</{tag}>"));
            }
            if let Some(tag) = list_tag {
                html.push_str(&format!("<{tag}>"));
            }
            open_list = list_tag;
        }

        let tag = element_for(block.block_type());
        html.push_str(&format!("<{tag}>"));
        html.push_str(&render_inline(block));
        html.push_str(&format!("</{tag}>"));
    }

    if let Some(tag) = open_list {
        html.push_str(&format!("</{tag}>"));
    }
    html
}

fn element_for(block_type: &BlockType) -> &'static str {
    match block_type {
        BlockType::HeaderOne => "h1",
        BlockType::HeaderTwo => "h2",
        BlockType::HeaderThree => "h3",
        BlockType::HeaderFour => "h4",
        BlockType::HeaderFive => "h5",
        BlockType::HeaderSix => "h6",
        BlockType::UnorderedListItem | BlockType::OrderedListItem => "li",
        BlockType::Blockquote => "blockquote",
        BlockType::CodeBlock => "pre",
        BlockType::Atomic => "figure",
        BlockType::Unstyled | BlockType::Paragraph | BlockType::Custom(_) => "p",
    }
}

fn style_element(style: &str) -> Option<&'static str> {
    match style {
        "BOLD" => Some("strong"),
        "ITALIC" => Some("em"),
        "UNDERLINE" => Some("u"),
        "STRIKETHROUGH" => Some("s"),
        "CODE" => Some("code"),
        _ => None,
    }
}

fn render_inline(block: &ContentBlock) -> String {
    let chars: Vec<char> = block.text().chars().collect();
    let mut html = String::new();

    block.find_style_ranges(
        |_| true,
        |start, end| {
            let text: String = chars[start..end].iter().collect();
            let tags: Vec<&str> = block
                .inline_style_at(start)
                .into_iter()
                .flatten()
                .filter_map(|style| style_element(style))
                .collect();

            for tag in &tags {
                html.push_str(&format!("<{tag}>"));
            }
            html.push_str(&encode_text(&text));
            for tag in tags.iter().rev() {
                html.push_str(&format!("</{tag}>"));
            }
        },
    );
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranges::{InlineStyleRange, create_character_list, decode_inline_style_ranges};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn bold(text: &str, offset: usize, length: usize) -> ContentBlock {
        let styles = decode_inline_style_ranges(
            text,
            &[InlineStyleRange {
                offset,
                length,
                style: "BOLD".to_string(),
            }],
        );
        let list = create_character_list(styles, vec![None; text.chars().count()]);
        ContentBlock::new("b", BlockType::Unstyled, text)
            .with_character_list(list)
            .unwrap()
    }

    #[test]
    fn test_renders_block_elements_and_escapes_text() {
        let fragment = BlockMap::from_blocks([
            ContentBlock::new("h", BlockType::HeaderTwo, "A < B"),
            ContentBlock::new("p", BlockType::Unstyled, "x & y"),
        ]);

        assert_eq!(render_html(&fragment), "<h2>A &lt; B</h2><p>x &amp; y</p>");
    }

    #[test]
    fn test_groups_consecutive_list_items() {
        let fragment = BlockMap::from_blocks([
            ContentBlock::new("1", BlockType::UnorderedListItem, "one"),
            ContentBlock::new("2", BlockType::UnorderedListItem, "two"),
            ContentBlock::new("3", BlockType::OrderedListItem, "first"),
            ContentBlock::new("4", BlockType::Unstyled, "after"),
        ]);

        assert_eq!(
            render_html(&fragment),
            "<ul><li>one</li><li>two</li></ul><ol><li>first</li></ol><p>after</p>"
        );
    }

    #[test]
    fn test_renders_inline_styles() {
        let fragment = BlockMap::from_blocks([bold("make this bold", 5, 4)]);
        assert_eq!(
            render_html(&fragment),
            "<p>make <strong>this</strong> bold</p>"
        );
    }

    #[test]
    fn test_plain_text_joins_blocks() {
        let fragment = BlockMap::from_blocks([
            ContentBlock::new("a", BlockType::Unstyled, "Hi"),
            ContentBlock::new("b", BlockType::Unstyled, "Bye"),
        ]);
        assert_eq!(BlockMapSelection::new(&fragment).plain_text(), "Hi\nBye");
    }

    #[rstest]
    #[case::custom(" | ", "Hi | Bye")]
    #[case::empty_means_newline("", "Hi\nBye")]
    fn test_plain_text_uses_delimiter(#[case] delimiter: &str, #[case] expected: &str) {
        let fragment = BlockMap::from_blocks([
            ContentBlock::new("a", BlockType::Unstyled, "Hi"),
            ContentBlock::new("b", BlockType::Unstyled, "Bye"),
        ]);
        let selection = BlockMapSelection::with_delimiter(&fragment, delimiter);

        assert_eq!(selection.plain_text(), expected);
    }
}
