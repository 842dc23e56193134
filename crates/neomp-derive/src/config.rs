//! Attribute parsing for `#[derive(Pack)]`'s `#[neomp(...)]` namespace.
//!
//! Container attributes set the *default* value of a runtime-configurable
//! leaf (`layout`/`format`) — callers can still override it per call by
//! constructing a different `Options` value by hand, since layout is part of
//! the options tree, not a compile-time-only choice.

use syn::{Attribute, LitStr};

#[derive(Clone, Copy, Debug)]
pub enum ProductLayout {
    Map,
    Array,
}

#[derive(Clone, Copy, Debug)]
pub enum SumLayout {
    Map,
    ActiveField,
}

#[derive(Clone, Copy, Debug)]
pub enum EnumFormat {
    Int,
    Str,
}

#[derive(Clone, Debug, Default)]
pub struct ContainerConfig {
    pub product_layout: Option<ProductLayout>,
    pub sum_layout: Option<SumLayout>,
    pub enum_format: Option<EnumFormat>,
}

impl ContainerConfig {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut config = ContainerConfig::default();
        for attr in attrs {
            if !attr.path().is_ident("neomp") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("layout") {
                    let value: LitStr = meta.value()?.parse()?;
                    match value.value().as_str() {
                        "map" => {
                            config.product_layout = Some(ProductLayout::Map);
                            config.sum_layout = Some(SumLayout::Map);
                        }
                        "array" => config.product_layout = Some(ProductLayout::Array),
                        "active_field" => config.sum_layout = Some(SumLayout::ActiveField),
                        other => {
                            return Err(meta.error(format!(
                                "unknown layout {other:?}, expected \"map\", \"array\", or \"active_field\""
                            )))
                        }
                    }
                    Ok(())
                } else if meta.path.is_ident("format") {
                    let value: LitStr = meta.value()?.parse()?;
                    match value.value().as_str() {
                        "int" => config.enum_format = Some(EnumFormat::Int),
                        "str" => config.enum_format = Some(EnumFormat::Str),
                        other => {
                            return Err(meta.error(format!(
                                "unknown format {other:?}, expected \"int\" or \"str\""
                            )))
                        }
                    }
                    Ok(())
                } else {
                    Err(meta.error("unrecognized neomp container attribute"))
                }
            })?;
        }
        Ok(config)
    }
}

/// Per-field/per-variant `#[neomp(rename = "...")]`.
#[derive(Clone, Debug, Default)]
pub struct MemberConfig {
    pub rename: Option<String>,
}

impl MemberConfig {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut config = MemberConfig::default();
        for attr in attrs {
            if !attr.path().is_ident("neomp") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    config.rename = Some(value.value());
                    Ok(())
                } else {
                    Err(meta.error("unrecognized neomp field attribute"))
                }
            })?;
        }
        Ok(config)
    }
}
