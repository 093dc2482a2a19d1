//! Vue single-file component block scanner.
//!
//! Splits a `.vue` file into its top-level `<script>`, `<script setup>`,
//! `<template>` and `<style>` blocks. Scanning is done with memchr instead of
//! regexes and never panics on malformed input.

use memchr::{memchr, memmem};

/// Maximum accepted file size (10 MB).
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Maximum number of top-level blocks in one file.
pub const MAX_BLOCKS: usize = 100;

/// Errors raised while scanning an SFC.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SfcError {
    #[error("file is too large: {size} bytes (max {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("too many top-level blocks: {count} (max {max})")]
    TooManyBlocks { count: usize, max: usize },

    #[error("unclosed <{tag}> block starting at byte {position}")]
    UnclosedTag { tag: String, position: usize },

    #[error("unclosed comment starting at byte {position}")]
    UnclosedComment { position: usize },

    #[error("duplicate {block} block at byte {position}")]
    DuplicateBlock { block: &'static str, position: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Script,
    ScriptSetup,
    Template,
    Style,
}

/// One top-level block.
#[derive(Debug, Clone)]
pub struct Block<'a> {
    pub kind: BlockKind,
    /// Text between the opening and closing tag.
    pub content: &'a str,
    /// Byte offset of `content` in the file.
    pub offset: usize,
    attrs: Vec<(&'a str, Option<&'a str>)>,
}

impl<'a> Block<'a> {
    /// Value of attribute `name`: `Some(None)` for a bare attribute.
    pub fn attr(&self, name: &str) -> Option<Option<&'a str>> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// The `lang` attribute, if set to a non-empty value.
    pub fn lang(&self) -> Option<&'a str> {
        self.attr("lang")
            .flatten()
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
    }
}

/// The blocks of one SFC.
#[derive(Debug, Clone, Default)]
pub struct SfcDescriptor<'a> {
    pub script: Option<Block<'a>>,
    pub script_setup: Option<Block<'a>>,
    pub template: Option<Block<'a>>,
    pub styles: Vec<Block<'a>>,
}

/// Scan `source` into its blocks.
pub fn parse(source: &str) -> Result<SfcDescriptor<'_>, SfcError> {
    if source.len() > MAX_FILE_SIZE {
        return Err(SfcError::FileTooLarge {
            size: source.len(),
            max: MAX_FILE_SIZE,
        });
    }

    let bytes = source.as_bytes();
    let mut descriptor = SfcDescriptor::default();
    let mut pointer = 0;
    let mut count = 0;

    while let Some(rel) = memchr(b'<', &bytes[pointer..]) {
        let start = pointer + rel;

        if bytes[start..].starts_with(b"<!--") {
            match memmem::find(&bytes[start + 4..], b"-->") {
                Some(end) => {
                    pointer = start + 4 + end + 3;
                    continue;
                }
                None => return Err(SfcError::UnclosedComment { position: start }),
            }
        }

        let name_start = start + 1;
        let name_len = bytes[name_start..]
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'-')
            .count();
        if name_len == 0 {
            // Stray `<`, closing tag or doctype.
            pointer = name_start;
            continue;
        }
        let name_end = name_start + name_len;
        let name = &source[name_start..name_end];

        let unclosed = || SfcError::UnclosedTag {
            tag: name.to_string(),
            position: start,
        };

        let tag_end = find_closing_angle(bytes, name_end).ok_or_else(unclosed)?;
        let attr_source = &source[name_end..tag_end];
        let content_start = tag_end + 1;

        let (content, next) = if attr_source.trim_end().ends_with('/') {
            ("", content_start)
        } else {
            let nested = name.eq_ignore_ascii_case("template");
            let (close_start, close_end) =
                find_block_end(bytes, content_start, name.as_bytes(), nested).ok_or_else(unclosed)?;
            (&source[content_start..close_start], close_end)
        };
        pointer = next;

        count += 1;
        if count > MAX_BLOCKS {
            return Err(SfcError::TooManyBlocks {
                count,
                max: MAX_BLOCKS,
            });
        }

        let attrs = parse_attributes(attr_source);
        let is_setup = attrs.iter().any(|(key, _)| key.eq_ignore_ascii_case("setup"));
        let block = |kind| Block {
            kind,
            content,
            offset: content_start,
            attrs: attrs.clone(),
        };

        match name.to_ascii_lowercase().as_str() {
            "script" if is_setup => {
                set_once(&mut descriptor.script_setup, block(BlockKind::ScriptSetup), "<script setup>", start)?
            }
            "script" => set_once(&mut descriptor.script, block(BlockKind::Script), "<script>", start)?,
            "template" => {
                set_once(&mut descriptor.template, block(BlockKind::Template), "<template>", start)?
            }
            "style" => descriptor.styles.push(block(BlockKind::Style)),
            other => tracing::debug!(block = other, "ignoring custom SFC block"),
        }
    }

    Ok(descriptor)
}

fn set_once<'a>(
    slot: &mut Option<Block<'a>>,
    block: Block<'a>,
    name: &'static str,
    position: usize,
) -> Result<(), SfcError> {
    if slot.is_some() {
        return Err(SfcError::DuplicateBlock {
            block: name,
            position,
        });
    }
    *slot = Some(block);
    Ok(())
}

/// Finds the closing `>` of an opening tag, handling quoted attributes.
fn find_closing_angle(bytes: &[u8], start: usize) -> Option<usize> {
    let mut in_quote = false;
    let mut quote_char = 0u8;

    for (i, &byte) in bytes[start..].iter().enumerate() {
        match byte {
            b'"' | b'\'' => {
                if !in_quote {
                    in_quote = true;
                    quote_char = byte;
                } else if byte == quote_char {
                    in_quote = false;
                }
            }
            b'>' if !in_quote => return Some(start + i),
            _ => {}
        }
    }

    None
}

fn is_tag_boundary(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | b'>' | b'/')
}

/// Finds `</name>` closing the block whose content starts at `start`.
///
/// Returns the offsets of the closing tag's `<` and one past its `>`. With
/// `nested`, inner `<name>` elements must be closed first (templates may
/// contain `<template>` elements).
fn find_block_end(bytes: &[u8], start: usize, name: &[u8], nested: bool) -> Option<(usize, usize)> {
    let open: Vec<u8> = [b"<".as_slice(), name].concat();
    let close: Vec<u8> = [b"</".as_slice(), name].concat();
    let mut depth = 0usize;
    let mut cursor = start;

    loop {
        let close_start = cursor + memmem::find(&bytes[cursor..], &close)?;

        if nested {
            let mut scan = cursor;
            while let Some(found) = memmem::find(&bytes[scan..close_start], &open) {
                let after = scan + found + open.len();
                if bytes.get(after).copied().is_some_and(is_tag_boundary) {
                    depth += 1;
                }
                scan = after;
            }
        }

        let after_name = close_start + close.len();
        if !bytes.get(after_name).copied().is_some_and(is_tag_boundary) {
            cursor = after_name;
            continue;
        }

        let close_end = after_name + memchr(b'>', &bytes[after_name..])? + 1;
        if depth == 0 {
            return Some((close_start, close_end));
        }
        depth -= 1;
        cursor = close_end;
    }
}

/// Parses `key`, `key=value`, `key="value"` and `key='value'` attributes.
fn parse_attributes(source: &str) -> Vec<(&str, Option<&str>)> {
    let bytes = source.as_bytes();
    let len = bytes.len();
    let mut attrs = Vec::new();
    let mut i = 0;

    while i < len {
        while i < len && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        if i >= len {
            break;
        }

        let name_start = i;
        while i < len && !bytes[i].is_ascii_whitespace() && !matches!(bytes[i], b'=' | b'/') {
            i += 1;
        }
        let name = &source[name_start..i];
        if name.is_empty() {
            i += 1;
            continue;
        }

        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i < len && bytes[i] == b'=' {
            i += 1;
            while i < len && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            let value = if i < len && matches!(bytes[i], b'"' | b'\'') {
                let quote = bytes[i];
                i += 1;
                let value_start = i;
                while i < len && bytes[i] != quote {
                    i += 1;
                }
                let value = &source[value_start..i];
                i += 1;
                value
            } else {
                let value_start = i;
                while i < len && !bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                &source[value_start..i]
            };
            attrs.push((name, Some(value)));
        } else {
            attrs.push((name, None));
        }
    }

    attrs
}
