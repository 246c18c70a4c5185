//! Text normalization helpers shared by the table loader, the column
//! resolver and the export generator.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize a spreadsheet header at load time.
///
/// Trims, lower-cases and collapses every internal whitespace run into a
/// single `_`. Accents are kept: `"Categoría  Producto"` → `"categoría_producto"`.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Fold a column name into its comparison key.
///
/// trim → lower-case → strip diacritics → spaces and hyphens to `_`.
pub fn column_key(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Make a filter value safe to embed in a file name.
///
/// Lower-cased, spaces become `_`, and only alphanumerics, `-` and `_` survive.
pub fn sanitize_file_component(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header_collapses_whitespace() {
        assert_eq!(normalize_header("  Precio   Unitario "), "precio_unitario");
        assert_eq!(normalize_header("Categoría"), "categoría");
        assert_eq!(normalize_header("CODIGO"), "codigo");
    }

    #[test]
    fn test_column_key_strips_accents_and_separators() {
        assert_eq!(column_key("Categoría"), "categoria");
        assert_eq!(column_key(" Descripción "), "descripcion");
        assert_eq!(column_key("categoria-producto"), "categoria_producto");
        assert_eq!(column_key("Categoria Producto"), "categoria_producto");
        assert_eq!(column_key("CÓDIGO"), "codigo");
    }

    #[test]
    fn test_sanitize_file_component() {
        assert_eq!(sanitize_file_component(" Vitaminas y Minerales "), "vitaminas_y_minerales");
        assert_eq!(sanitize_file_component("Proteínas/Whey!"), "proteínaswhey");
        assert_eq!(sanitize_file_component("a-b_c"), "a-b_c");
    }
}
