//! Baking transforms into geometry.
//!
//! Each geometry element has its full transform (its own plus those of its
//! ancestor groups) applied to its path data, after which the transforms
//! themselves are removed. Elements without editable geometry, such as
//! `text`, get a single readable transform in place of the chain.

use std::collections::HashMap;
use std::str::FromStr;

use crate::document::{Element, Node};
use crate::errors::{Error, Result};
use crate::geometry::{AffineMatrix, BoundingBox};
use crate::path::{
    normalize, path_bbox, path_data_from_element, serialize, Command, NormalizeOptions, PathData,
    SerializeOptions, EXCLUDED_ATTRS, SHAPE_ELEMENTS,
};
use crate::transform_attr::TransformAttr;
use crate::types::{attr_split, fstr, strp, Length};

#[cfg(feature = "json")]
use serde_derive::Deserialize;

use tracing::{debug, warn};

// matrices equal to identity at this precision are left alone
const IDENTITY_DECIMALS: u32 = 3;

// `use` elements may reference content containing further `use` elements
const MAX_USE_DEPTH: usize = 8;

/// Elements whose transform passes down to their children.
const GROUP_ELEMENTS: &[&str] = &["g", "a", "switch"];

/// Elements whose content is not rendered in place; left untouched.
const TEMPLATE_ELEMENTS: &[&str] = &[
    "defs",
    "symbol",
    "marker",
    "pattern",
    "mask",
    "clipPath",
    "linearGradient",
    "radialGradient",
    "filter",
    "style",
    "script",
    "title",
    "desc",
    "metadata",
];

/// Length attributes resolved against the viewport height rather than
/// its width.
const VERTICAL_ATTRS: &[&str] = &["y", "y1", "y2", "ry", "cy", "height"];

/// Access to a host element, as needed to bake its transform.
pub trait Drawable {
    fn tag_name(&self) -> &str;
    fn get_attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&mut self, name: &str, value: &str);
    fn remove_attribute(&mut self, name: &str);
    /// Transform from the element's own coordinates to those of the
    /// outermost viewport.
    fn get_screen_transform_matrix(&self) -> Result<AffineMatrix>;
    /// Extent of the element's geometry in its own coordinates; `None`
    /// when it has no drawable segments.
    fn get_bounding_box(&self) -> Result<Option<BoundingBox>>;
}

impl Drawable for Element {
    fn tag_name(&self) -> &str {
        self.name()
    }

    fn get_attribute(&self, name: &str) -> Option<String> {
        self.get_attr(name).map(String::from)
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        self.set_attr(name, value);
    }

    fn remove_attribute(&mut self, name: &str) {
        self.remove_attr(name);
    }

    /// A standalone element only has its own transform.
    fn get_screen_transform_matrix(&self) -> Result<AffineMatrix> {
        own_transform(self)
    }

    fn get_bounding_box(&self) -> Result<Option<BoundingBox>> {
        let path = path_data_from_element(self.name(), |k| self.get_attribute(k))?;
        Ok(path_bbox(&path))
    }
}

/// An element in a document, along with the accumulated transform of
/// its ancestors.
pub struct PlacedElement<'a> {
    element: &'a mut Element,
    parent_matrix: AffineMatrix,
}

impl<'a> PlacedElement<'a> {
    pub fn new(element: &'a mut Element, parent_matrix: AffineMatrix) -> Self {
        Self {
            element,
            parent_matrix,
        }
    }
}

impl Drawable for PlacedElement<'_> {
    fn tag_name(&self) -> &str {
        self.element.tag_name()
    }

    fn get_attribute(&self, name: &str) -> Option<String> {
        self.element.get_attribute(name)
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        self.element.set_attribute(name, value);
    }

    fn remove_attribute(&mut self, name: &str) {
        self.element.remove_attribute(name);
    }

    fn get_screen_transform_matrix(&self) -> Result<AffineMatrix> {
        Ok(self.parent_matrix.multiply(&own_transform(self.element)?))
    }

    fn get_bounding_box(&self) -> Result<Option<BoundingBox>> {
        self.element.get_bounding_box()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(Deserialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct FlattenOptions {
    /// Replace nested `svg` elements with groups
    pub decompose_nested: bool,
    /// Replace `use` elements with groups holding a copy of what they
    /// reference
    pub decompose_use: bool,
    /// Decimal places for rewritten coordinates and stroke widths
    pub decimals: Option<u32>,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            decompose_nested: false,
            decompose_use: false,
            decimals: Some(3),
        }
    }
}

fn own_transform(el: &Element) -> Result<AffineMatrix> {
    match el.get_attr("transform") {
        Some(t) => Ok(TransformAttr::from_str(t)?.to_matrix()),
        None => Ok(AffineMatrix::identity()),
    }
}

fn transform_path(path: &PathData, matrix: &AffineMatrix) -> PathData {
    path.iter()
        .map(|cmd| {
            let values = cmd
                .values()
                .chunks(2)
                .flat_map(|xy| match xy {
                    &[x, y] => {
                        let p = matrix.apply((x, y).into());
                        vec![p.x, p.y]
                    }
                    other => other.to_vec(),
                })
                .collect();
            Command::from_parts(cmd.kind(), values)
        })
        .collect()
}

/// Scale a visible stroke's width by the mean of the transform's scale
/// factors. Only the `stroke` and `stroke-width` attributes are read.
fn scale_stroke_width(el: &mut impl Drawable, scale: f64, decimals: Option<u32>) -> Result<()> {
    let stroked = el.get_attribute("stroke").is_some_and(|s| s.trim() != "none");
    if !stroked {
        return Ok(());
    }
    let width = match el.get_attribute("stroke-width") {
        Some(w) => strp(w.trim().trim_end_matches("px"))?,
        None => 1.,
    };
    el.set_attribute("stroke-width", &fstr(width * scale, decimals));
    Ok(())
}

/// Apply an element's screen transform directly to it.
///
/// `path` elements have the matrix applied to every coordinate of their
/// (absolute, longhand, arc-free) path data, and lose their `transform`.
/// Other shapes must be converted to paths first. Anything else is given
/// the decomposed transform in readable form. Returns whether the
/// element changed; transforms equal to identity at 3 decimal places are
/// left as they are.
pub fn bake_transform(el: &mut impl Drawable, options: &FlattenOptions) -> Result<bool> {
    let matrix = el.get_screen_transform_matrix()?;
    if matrix.is_identity(IDENTITY_DECIMALS) {
        return Ok(false);
    }
    let decomposition = matrix.decompose();
    let tag = el.tag_name().to_string();

    if tag != "path" {
        if SHAPE_ELEMENTS.contains(&tag.as_str()) {
            return Err(Error::Document(format!(
                "'{tag}' must be converted to a path before baking its transform"
            )));
        }
        let transform = decomposition.to_transform_attr();
        if transform.is_empty() {
            el.remove_attribute("transform");
        } else {
            el.set_attribute("transform", &transform.to_string());
        }
        el.remove_attribute("transform-origin");
        return Ok(true);
    }

    if el.get_bounding_box()?.is_none() {
        debug!("no geometry to transform");
        return Ok(false);
    }
    scale_stroke_width(el, decomposition.mean_scale(), options.decimals)?;

    let path = path_data_from_element("path", |k| el.get_attribute(k))?;
    let path = normalize(
        &path,
        &NormalizeOptions {
            arcs_to_cubic: true,
            ..Default::default()
        },
    );
    let baked = transform_path(&path, &matrix);
    let out_options = SerializeOptions {
        decimals: options.decimals,
        relative: false,
        shorthands: false,
        ..Default::default()
    };
    el.set_attribute("d", &serialize(&baked, &out_options));
    el.remove_attribute("transform");
    el.remove_attribute("transform-origin");
    Ok(true)
}

/// Rewrite a primitive shape element as an equivalent `path`.
pub fn convert_to_path(el: &mut Element) -> Result<()> {
    if el.name() == "path" {
        return Ok(());
    }
    let path = path_data_from_element(el.name(), |k| el.get_attribute(k))?;
    for attr in EXCLUDED_ATTRS {
        el.remove_attr(attr);
    }
    el.set_name("path");
    let options = SerializeOptions {
        decimals: None,
        ..Default::default()
    };
    el.set_attr("d", &serialize(&path, &options));
    Ok(())
}

fn parse_view_box(el: &Element) -> Option<[f64; 4]> {
    let values = attr_split(el.get_attr("viewBox")?)
        .map(|v| strp(&v))
        .collect::<Result<Vec<_>>>()
        .ok()?;
    match values.as_slice() {
        &[x, y, w, h] if w > 0. && h > 0. => Some([x, y, w, h]),
        _ => None,
    }
}

fn abs_length(el: &Element, key: &str) -> Option<f64> {
    match Length::parse(el.get_attr(key)?) {
        Ok(Length::Absolute(v)) => Some(v),
        _ => None,
    }
}

/// Size which percentages inside `el` refer to: its viewBox if it has
/// one, otherwise its width and height.
fn viewport_size(el: &Element) -> Option<(f64, f64)> {
    if let Some([_, _, w, h]) = parse_view_box(el) {
        return Some((w, h));
    }
    Some((abs_length(el, "width")?, abs_length(el, "height")?))
}

fn resolve_percentages(el: &mut Element, size: Option<(f64, f64)>) {
    let name = el.name().to_string();
    for (key, value) in el.attrs_mut().iter_mut() {
        if !value.contains('%') || !EXCLUDED_ATTRS.contains(&key.as_str()) {
            continue;
        }
        let (Some((width, height)), Ok(length @ Length::Ratio(_))) = (size, Length::parse(value))
        else {
            debug!(element = %name, attr = key.as_str(), "percentage left unresolved");
            continue;
        };
        let reference = if VERTICAL_ATTRS.contains(&key.as_str()) {
            height
        } else {
            width
        };
        *value = fstr(length.resolve(reference), Some(6));
    }
}

fn percentages_below(parent: &mut Element, size: Option<(f64, f64)>) {
    for el in parent.child_elements_mut() {
        resolve_percentages(el, size);
        let inner = if matches!(el.name(), "svg" | "symbol") {
            viewport_size(el).or(size)
        } else {
            size
        };
        percentages_below(el, inner);
    }
}

/// Replace percentage lengths in geometry attributes with user units.
///
/// Percentages refer to the nearest enclosing `svg` or `symbol`: its
/// viewBox, or failing that its width and height. Vertical attributes use
/// the height; everything else uses the width.
pub fn percentage_to_absolute(root: &mut Element) {
    let size = viewport_size(root);
    percentages_below(root, size);
}

/// Matrix placing a nested `svg` viewport's content in its parent's
/// coordinates, from `x`, `y`, `width`, `height`, `viewBox` and
/// `preserveAspectRatio`.
fn viewport_matrix(el: &Element) -> Result<AffineMatrix> {
    let num = |key: &str| el.get_attr(key).map_or(Ok(0.), |v| strp(v.trim_end_matches("px")));
    let placement = AffineMatrix::translate(num("x")?, num("y")?);
    let (Some([vb_x, vb_y, vb_w, vb_h]), Some(width), Some(height)) = (
        parse_view_box(el),
        abs_length(el, "width"),
        abs_length(el, "height"),
    ) else {
        return Ok(placement);
    };

    let aspect = el.get_attr("preserveAspectRatio").unwrap_or("xMidYMid meet");
    let (sx, sy, align_x, align_y) = if aspect.trim().starts_with("none") {
        (width / vb_w, height / vb_h, 0., 0.)
    } else {
        let scale = if aspect.contains("slice") {
            (width / vb_w).max(height / vb_h)
        } else {
            (width / vb_w).min(height / vb_h)
        };
        let align = |min: &str, max: &str| {
            if aspect.contains(min) {
                0.
            } else if aspect.contains(max) {
                1.
            } else {
                0.5
            }
        };
        (scale, scale, align("xMin", "xMax"), align("YMin", "YMax"))
    };
    let tx = (width - vb_w * sx) * align_x - vb_x * sx;
    let ty = (height - vb_h * sy) * align_y - vb_y * sy;
    Ok(placement
        .multiply(&AffineMatrix::translate(tx, ty))
        .multiply(&AffineMatrix::scale(sx, sy)))
}

fn set_matrix_transform(el: &mut Element, matrix: AffineMatrix) {
    if matrix.is_identity(6) {
        el.remove_attr("transform");
    } else {
        el.set_attr("transform", &TransformAttr::from(matrix).to_string());
    }
}

/// Turn every nested `svg` into a `g` carrying the equivalent transform.
pub fn decompose_nested_svgs(parent: &mut Element) -> Result<()> {
    for el in parent.child_elements_mut() {
        if el.name() == "svg" {
            let matrix = own_transform(el)?.multiply(&viewport_matrix(el)?);
            for attr in ["x", "y", "width", "height", "viewBox", "preserveAspectRatio"] {
                el.remove_attr(attr);
            }
            el.set_name("g");
            set_matrix_transform(el, matrix);
        }
        decompose_nested_svgs(el)?;
    }
    Ok(())
}

fn href_id(el: &Element) -> Option<&str> {
    el.get_attr("href")
        .or_else(|| el.get_attr("xlink:href"))
        .and_then(|h| h.trim().strip_prefix('#'))
}

/// A group standing in for a `use` element, or `None` if its reference
/// cannot be resolved.
fn use_to_group(
    use_el: &Element,
    templates: &HashMap<String, Element>,
    root_size: Option<(f64, f64)>,
) -> Result<Option<Element>> {
    let Some(template) = href_id(use_el).and_then(|id| templates.get(id)) else {
        warn!(href = ?href_id(use_el), "skipping use element with unresolved reference");
        return Ok(None);
    };

    let mut group = Element::new("g");
    for (key, value) in use_el.attrs().iter() {
        let skip = ["d", "href", "xlink:href", "transform"].contains(&key.as_str())
            || EXCLUDED_ATTRS.contains(&key.as_str());
        if !skip {
            group.set_attr(key, value);
        }
    }

    let mut transform = match use_el.get_attr("transform") {
        Some(t) => TransformAttr::from_str(t)?,
        None => TransformAttr::new(),
    };
    let num = |key: &str| use_el.get_attr(key).map_or(Ok(0.), strp);
    let (x, y) = (num("x")?, num("y")?);
    if x != 0. || y != 0. {
        transform.translate(x, y);
    }

    if template.name() == "symbol" {
        if let Some([vb_x, vb_y, vb_w, vb_h]) = parse_view_box(template) {
            let size = match (abs_length(use_el, "width"), abs_length(use_el, "height")) {
                (Some(w), Some(h)) => Some((w, h)),
                _ => root_size,
            };
            let scale = size.map_or(1., |(w, h)| if w > h { h / vb_h } else { w / vb_w });
            if scale != 1. {
                transform.scale(scale, scale);
            }
            if vb_x != 0. || vb_y != 0. {
                transform.translate(-vb_x, -vb_y);
            }
        }
        for child in template.children() {
            group.push_child(child.clone());
        }
    } else {
        let mut copy = template.clone();
        copy.remove_attr("id");
        group.push_child(Node::Element(copy));
    }
    if !transform.is_empty() {
        group.set_attr("transform", &transform.to_string());
    }
    Ok(Some(group))
}

fn replace_uses(
    parent: &mut Element,
    templates: &HashMap<String, Element>,
    root_size: Option<(f64, f64)>,
    depth: usize,
) -> Result<()> {
    if depth > MAX_USE_DEPTH {
        warn!(depth, "use elements nested too deeply; leaving the rest");
        return Ok(());
    }
    for node in parent.children_mut().iter_mut() {
        let Node::Element(child) = node else {
            continue;
        };
        if child.name() == "use" {
            if let Some(mut group) = use_to_group(child, templates, root_size)? {
                replace_uses(&mut group, templates, root_size, depth + 1)?;
                *node = Node::Element(group);
            }
        } else {
            replace_uses(child, templates, root_size, depth)?;
        }
    }
    Ok(())
}

/// Replace each `use` with a group holding a copy of the content it
/// references, then remove the referenced symbols.
pub fn decompose_use_elements(root: &mut Element) -> Result<()> {
    let mut templates = HashMap::new();
    root.walk(&mut |el| {
        if el.name() != "use" {
            return;
        }
        if let Some(id) = href_id(el) {
            if let Some(target) = root.find_by_id(id) {
                templates.insert(id.to_string(), target.clone());
            }
        }
    });
    let root_size = parse_view_box(root).map(|[_, _, w, h]| (w, h));
    replace_uses(root, &templates, root_size, 0)?;

    for (id, template) in &templates {
        if template.name() == "symbol" {
            root.remove_by_id(id);
        }
    }
    Ok(())
}

fn flatten_below(parent: &mut Element, matrix: AffineMatrix, options: &FlattenOptions) -> Result<()> {
    for el in parent.child_elements_mut() {
        let name = el.name().to_string();
        if TEMPLATE_ELEMENTS.contains(&name.as_str()) {
            continue;
        }
        if GROUP_ELEMENTS.contains(&name.as_str()) {
            let inner = matrix.multiply(&own_transform(el)?);
            flatten_below(el, inner, options)?;
            el.remove_attr("transform");
            el.remove_attr("transform-origin");
            continue;
        }
        let converted = if SHAPE_ELEMENTS.contains(&name.as_str()) {
            convert_to_path(el)
        } else {
            Ok(())
        };
        let result = converted.and_then(|_| bake_transform(&mut PlacedElement::new(el, matrix), options));
        match result {
            Ok(changed) => debug!(element = %name, changed, "flattened"),
            Err(err) => warn!(element = %name, %err, "skipping element"),
        }
    }
    Ok(())
}

/// Flatten all transforms below the root `svg` element.
///
/// Optionally decomposes nested `svg` and `use` elements into groups
/// first. Primitive shapes become paths, every rendered element has its
/// transform baked in (see `bake_transform`), and group transforms are
/// removed. Content of `defs`, `symbol` and similar template elements is
/// left unchanged.
pub fn flatten_document(root: &mut Element, options: &FlattenOptions) -> Result<()> {
    if options.decompose_nested || options.decompose_use {
        percentage_to_absolute(root);
    }
    if options.decompose_nested {
        decompose_nested_svgs(root)?;
    }
    if options.decompose_use {
        decompose_use_elements(root)?;
    }
    flatten_below(root, AffineMatrix::identity(), options)
}
