//! Audit aids: classify or purify a single value without crawling

use anyhow::{Context, Result};

use brickdoc::error::{BrickdocErrorTrait, Error};
use brickdoc::matcher::match_instruction;
use brickdoc::purify::{purify, purify_id, purify_instruction_description, purify_title, Field};

/// Print the instruction match result for one description as JSON
///
/// Inputs are purified first, the same way the crawl pipeline does.
pub fn match_description(
    description: &str,
    product_id: &str,
    title: &str,
    siblings: usize,
) -> Result<()> {
    let description = purify_instruction_description(description)?;
    let product_id = purify_id(product_id)?;
    let title = purify_title(title)?;

    let result = match_instruction(&description, &product_id, siblings, &title);

    let output = serde_json::json!({
        "description": description,
        "productId": product_id,
        "title": title,
        "siblings": siblings,
        "matchResult": result,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print the purified value, or fail with the classified error
pub fn purify_value(field: &str, value: &str) -> Result<()> {
    let purified = purify_classified(field, value)?;
    println!("{purified}");
    Ok(())
}

/// Purify `value`; a failure carries its error category as context
fn purify_classified(field: &str, value: &str) -> Result<String> {
    let field: Field = field.parse().with_context(|| {
        let names: Vec<&str> = Field::all().iter().map(Field::as_str).collect();
        format!("Valid fields: {}", names.join(", "))
    })?;

    purify(field, value).map_err(|e| {
        let err = Error::from(e);
        let category = err.category().as_str();
        anyhow::Error::new(err).context(format!("{category} error in {field}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purify_classified_ok() {
        assert_eq!(purify_classified("title", "Example.Set").unwrap(), "Example Set");
    }

    #[test]
    fn test_purify_classified_error_names_category_once() {
        let err = purify_classified("theme", "City TM").unwrap_err();
        let rendered = format!("{err:#}");

        assert!(rendered.starts_with("validation error in productTheme"));
        assert_eq!(rendered.matches("validation").count(), 1);
        assert!(err.downcast_ref::<Error>().is_some());
    }

    #[test]
    fn test_purify_classified_unknown_field() {
        let err = purify_classified("colour", "x").unwrap_err();
        assert!(format!("{err:#}").contains("unknown field: colour"));
    }
}
