//! Function discovery (SyntaxScanner)
//!
//! Parses a source file with `syn` and records, in source order, every
//! function declaration whose body can hold a tracking statement:
//!
//! | Declaration | Recorded as |
//! |-------------|-------------|
//! | top-level `fn` | `Free`, bare name |
//! | `fn` in a top-level `impl` | `Method`, `Type::name` |
//! | provided method of a top-level `trait` | `TraitDefault`, `Trait::name` |
//!
//! Signatures without a body, `const fn`, closures, and items nested in
//! bodies or inline modules produce no record.

use proc_macro2::Span;
use serde::Serialize;
use syn::ext::IdentExt;
use syn::visit::Visit;
use syn::{
    AttrStyle, Attribute, Block, ImplItem, ImplItemFn, Item, ItemFn, ItemImpl, ItemTrait,
    Signature, TraitItem, TraitItemFn, Type,
};
use tracing::debug;

use crate::line_index::LineIndex;
use crate::{InstrumentError, Result};

const BOM: &str = "\u{feff}";

/// How a recorded function is declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionKind {
    /// Top-level `fn`
    Free,
    /// `fn` inside a top-level `impl` block
    Method,
    /// Provided method of a top-level `trait`
    TraitDefault,
}

/// One instrumentable function
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionRecord {
    /// Function name, `Owner::name` for methods
    pub name: String,
    /// Line of the `fn` keyword (1-indexed)
    pub line: u32,
    /// Byte offset of the body's opening `{`
    pub body_open_offset: usize,
    /// Byte offset where the tracking statement goes: right after the `{`,
    /// or after the body's inner attributes when it has any
    pub insert_offset: usize,
    /// Declaration kind
    pub kind: FunctionKind,
}

impl FunctionKind {
    /// Lowercase label, as serialized
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Method => "method",
            Self::TraitDefault => "trait_default",
        }
    }
}

impl std::fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FunctionRecord {
    /// Whether this is the top-level function named `entry_point`
    #[must_use]
    pub fn is_entry_point(&self, entry_point: &str) -> bool {
        self.kind == FunctionKind::Free && self.name == entry_point
    }
}

/// Scan `content` for instrumentable functions, in source order
pub fn scan(content: &[u8]) -> Result<Vec<FunctionRecord>> {
    let text = std::str::from_utf8(content)?;
    let (base, body) = text
        .strip_prefix(BOM)
        .map_or((0, text), |rest| (BOM.len(), rest));

    let file = syn::parse_file(body).map_err(|e| InstrumentError::parse(&e))?;

    let mut collector = FunctionCollector::new(LineIndex::new(body, base), content);
    collector.visit_file(&file);
    let records = collector.finish()?;

    debug!(functions = records.len(), "scanned source");
    Ok(records)
}

/// Visitor over the top level of a file; never descends into bodies
struct FunctionCollector<'a> {
    index: LineIndex<'a>,
    content: &'a [u8],
    owner: Option<String>,
    records: Vec<FunctionRecord>,
    error: Option<InstrumentError>,
}

impl<'a> FunctionCollector<'a> {
    fn new(index: LineIndex<'a>, content: &'a [u8]) -> Self {
        Self {
            index,
            content,
            owner: None,
            records: Vec::new(),
            error: None,
        }
    }

    fn finish(self) -> Result<Vec<FunctionRecord>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.records),
        }
    }

    fn record(&mut self, sig: &Signature, attrs: &[Attribute], block: &Block, kind: FunctionKind) {
        if self.error.is_some() {
            return;
        }

        let ident = sig.ident.unraw().to_string();
        let name = match (&self.owner, kind) {
            (Some(owner), FunctionKind::Method | FunctionKind::TraitDefault) => {
                format!("{owner}::{ident}")
            }
            _ => ident,
        };

        // A const fn body cannot store to an atomic.
        if sig.constness.is_some() {
            debug!(function = %name, "skipping const fn");
            return;
        }

        let located = self.locate_body(block.brace_token.span.open(), attrs);
        match located {
            Ok((body_open_offset, insert_offset)) => self.records.push(FunctionRecord {
                name,
                line: sig.fn_token.span.start().line as u32,
                body_open_offset,
                insert_offset,
                kind,
            }),
            Err(err) => self.error = Some(err),
        }
    }

    /// Offsets of the body's `{` and of the first statement position
    fn locate_body(&self, open: Span, attrs: &[Attribute]) -> Result<(usize, usize)> {
        let start = open.start();
        let body_open = self
            .index
            .offset(start)
            .filter(|&offset| self.content.get(offset) == Some(&b'{'))
            .ok_or_else(|| {
                InstrumentError::internal(format!(
                    "no body delimiter at line {}, column {}",
                    start.line, start.column
                ))
            })?;

        let mut insert = body_open + 1;
        for attr in attrs
            .iter()
            .filter(|attr| matches!(attr.style, AttrStyle::Inner(_)))
        {
            insert = insert.max(self.inner_attribute_end(attr)?);
        }
        Ok((body_open, insert))
    }

    /// Offset just past an inner attribute
    ///
    /// A `//!` comment runs to the end of its line, so the position after it
    /// is the start of the next line.
    fn inner_attribute_end(&self, attr: &Attribute) -> Result<usize> {
        let lookup = |span: Span, at_end: bool| {
            let position = if at_end { span.end() } else { span.start() };
            self.index.offset(position).ok_or_else(|| {
                InstrumentError::internal(format!(
                    "attribute position out of range at line {}",
                    position.line
                ))
            })
        };

        let start = lookup(attr.pound_token.spans[0], false)?;
        let end = lookup(attr.bracket_token.span.close(), true)?;
        if self.content[start..].starts_with(b"//") {
            let line_end = self.content[end..]
                .iter()
                .position(|&b| b == b'\n')
                .map_or(self.content.len(), |i| end + i + 1);
            return Ok(line_end);
        }
        Ok(end)
    }
}

impl<'ast> Visit<'ast> for FunctionCollector<'_> {
    fn visit_item(&mut self, item: &'ast Item) {
        match item {
            Item::Fn(item_fn) => self.visit_item_fn(item_fn),
            Item::Impl(item_impl) => self.visit_item_impl(item_impl),
            Item::Trait(item_trait) => self.visit_item_trait(item_trait),
            // Items inside inline modules or const blocks cannot name the
            // file-level table without a path.
            _ => {}
        }
    }

    fn visit_item_fn(&mut self, item_fn: &'ast ItemFn) {
        self.record(
            &item_fn.sig,
            &item_fn.attrs,
            &item_fn.block,
            FunctionKind::Free,
        );
    }

    fn visit_item_impl(&mut self, item_impl: &'ast ItemImpl) {
        self.owner = owner_name(&item_impl.self_ty);
        for item in &item_impl.items {
            if let ImplItem::Fn(method) = item {
                self.visit_impl_item_fn(method);
            }
        }
        self.owner = None;
    }

    fn visit_impl_item_fn(&mut self, method: &'ast ImplItemFn) {
        self.record(&method.sig, &method.attrs, &method.block, FunctionKind::Method);
    }

    fn visit_item_trait(&mut self, item_trait: &'ast ItemTrait) {
        self.owner = Some(item_trait.ident.unraw().to_string());
        for item in &item_trait.items {
            if let TraitItem::Fn(method) = item {
                self.visit_trait_item_fn(method);
            }
        }
        self.owner = None;
    }

    fn visit_trait_item_fn(&mut self, method: &'ast TraitItemFn) {
        if let Some(block) = &method.default {
            self.record(&method.sig, &method.attrs, block, FunctionKind::TraitDefault);
        }
    }
}

/// Last path segment of an impl's self type
fn owner_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.unraw().to_string()),
        Type::Reference(reference) => owner_name(&reference.elem),
        Type::Paren(paren) => owner_name(&paren.elem),
        Type::Group(group) => owner_name(&group.elem),
        _ => None,
    }
}
