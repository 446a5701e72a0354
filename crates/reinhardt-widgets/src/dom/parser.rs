//! HTML fragment parsing through `scraper` (html5ever).
//!
//! Markup is parsed the way a browser parses `innerHTML`: character
//! references are decoded, implied end tags and table sections are inserted,
//! and comments and doctypes are dropped. The parsed nodes are then copied
//! into the retained tree.

use scraper::{ElementRef, Html, Node};

use super::element::Element;

/// Marks the element whose children are the parsed fragment.
const CONTEXT_ATTR: &str = "data-reinhardt-fragment";

/// Parses `markup` as the content of a `context` element.
///
/// html5ever parses fragments in `<body>` context, where table parts and
/// `<option>` lists would be dropped; those contexts are rebuilt around the
/// markup and located again through [`context_element`].
pub(crate) fn parse_in_context(context: &str, markup: &str) -> Html {
	let wrapped = match context {
		"table" => format!("<table {}>{}</table>", CONTEXT_ATTR, markup),
		"thead" | "tbody" | "tfoot" => format!(
			"<table><{tag} {attr}>{markup}</{tag}></table>",
			tag = context,
			attr = CONTEXT_ATTR,
			markup = markup,
		),
		"tr" => format!(
			"<table><tbody><tr {}>{}</tr></tbody></table>",
			CONTEXT_ATTR, markup
		),
		"select" => format!("<select {}>{}</select>", CONTEXT_ATTR, markup),
		_ => return Html::parse_fragment(markup),
	};
	Html::parse_fragment(&wrapped)
}

/// The element holding the parsed fragment: the rebuilt context element, or
/// the fragment root when no context was needed.
pub(crate) fn context_element(html: &Html) -> ElementRef<'_> {
	let root = html.root_element();
	root.descendants()
		.filter_map(ElementRef::wrap)
		.find(|element| element.value().attr(CONTEXT_ATTR).is_some())
		.unwrap_or(root)
}

/// The container a detached `tag` element needs to survive reparsing.
pub(crate) fn context_for(tag: &str) -> &'static str {
	match tag {
		"thead" | "tbody" | "tfoot" | "caption" | "colgroup" => "table",
		"tr" => "tbody",
		"td" | "th" => "tr",
		"option" | "optgroup" => "select",
		_ => "body",
	}
}

/// Parses `markup` and appends the resulting nodes to `container`.
pub(crate) fn parse_into(container: &Element, markup: &str) {
	let html = parse_in_context(&container.tag_name(), markup);
	let owner = container.owner_document();
	let create = |tag: &str| match &owner {
		Some(document) => document.create_element(tag),
		None => Element::new(tag),
	};
	copy_children(container, context_element(&html), &create);
}

fn copy_children(parent: &Element, source: ElementRef<'_>, create: &dyn Fn(&str) -> Element) {
	for child in source.children() {
		match child.value() {
			Node::Text(text) => parent.append_text(&**text),
			Node::Element(data) => {
				let element = create(data.name());
				for (name, value) in data.attrs() {
					element.set_attribute(name, value);
				}
				parent.append_child(&element);
				if let Some(child) = ElementRef::wrap(child) {
					copy_children(&element, child, create);
				}
			}
			_ => {}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn parse(markup: &str) -> Element {
		let container = Element::new("div");
		parse_into(&container, markup);
		container
	}

	#[rstest]
	fn test_nested_elements_and_text() {
		let root = parse("<p>Hello <b>world</b>!</p>");
		let p = &root.children()[0];
		assert_eq!(p.text_content(), "Hello world!");
		assert_eq!(p.children()[0].tag_name(), "b");
	}

	#[rstest]
	fn test_attribute_forms() {
		let root = parse(r#"<input type=checkbox data-x='a "b"' checked NAME="n" name="ignored">"#);
		let input = &root.children()[0];
		assert_eq!(input.get_attribute("type").as_deref(), Some("checkbox"));
		assert_eq!(input.get_attribute("data-x").as_deref(), Some(r#"a "b""#));
		assert_eq!(input.get_attribute("checked").as_deref(), Some(""));
		assert_eq!(input.get_attribute("name").as_deref(), Some("n"));
	}

	#[rstest]
	fn test_json_attribute_entities() {
		let root = parse(r#"<div data-props="{&quot;pageSize&quot;:5}"></div>"#);
		assert_eq!(
			root.children()[0].get_attribute("data-props").as_deref(),
			Some(r#"{"pageSize":5}"#)
		);
	}

	#[rstest]
	fn test_void_elements_take_no_children() {
		let root = parse("<br><input>text<span></span>");
		let children = root.children();
		assert_eq!(children.len(), 3);
		assert!(children.iter().all(|child| child.children().is_empty()));
		assert_eq!(root.text_content(), "text");
	}

	#[rstest]
	fn test_raw_text_elements() {
		let root = parse(r#"<script type="application/json">[{"a":"<b>"}]</script><textarea>x &lt; y</textarea>"#);
		let children = root.children();
		assert_eq!(children[0].text_content(), r#"[{"a":"<b>"}]"#);
		assert_eq!(children[1].text_content(), "x < y");
	}

	#[rstest]
	fn test_comments_and_stray_end_tags() {
		let root = parse("<!doctype html><!-- note --><div></span>a</div></div>b");
		assert_eq!(root.children().len(), 1);
		assert_eq!(root.text_content(), "ab");
	}

	#[rstest]
	fn test_implied_end_tags() {
		let root = parse("<ul><li>one<li>two");
		let items = root.children()[0].children();
		assert_eq!(items.len(), 2);
		assert_eq!(root.text_content(), "onetwo");
	}

	#[rstest]
	#[case("a &amp; b", "a & b")]
	#[case("&#65;&#x42;", "AB")]
	#[case("Zo&euml; &hellip; &copy;", "Zoë … ©")]
	#[case("&laquo; &lsaquo; &rsaquo; &raquo;", "« ‹ › »")]
	#[case("&unknown; &", "&unknown; &")]
	#[case("1 < 2", "1 < 2")]
	fn test_decode_entities(#[case] raw: &str, #[case] expected: &str) {
		let root = parse(raw);
		assert_eq!(root.text_content(), expected);
	}

	#[rstest]
	#[case("tbody", "<tr><td>1</td></tr>", "tr")]
	#[case("table", "<tr><td>1</td></tr>", "tbody")]
	#[case("tr", "<td>1</td><td>2</td>", "td")]
	#[case("select", "<option>a</option><option>b</option>", "option")]
	fn test_table_and_select_contexts(#[case] context: &str, #[case] markup: &str, #[case] child: &str) {
		let container = Element::new(context);
		parse_into(&container, markup);
		let children = container.children();
		assert!(!children.is_empty());
		assert!(children.iter().all(|element| element.tag_name() == child));
	}

	#[rstest]
	fn test_rows_outside_table_context_lose_their_tags() {
		let root = parse("<tr><td>1</td></tr>");
		assert!(root.children().is_empty());
		assert_eq!(root.text_content(), "1");
	}
}
