//! Interactive prompts and confirmation gates
//!
//! Required fields are enforced before anything is dispatched, and
//! destructive actions need either an attended confirmation or an explicit
//! `--yes`.

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use miette::{IntoDiagnostic, Result};

use crate::entities::category::allowed_subcategories;
use crate::entities::{Category, SubCategory};

fn theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

/// Gate for destructive actions.
///
/// Returns `Ok(false)` when the user declines; the caller must then issue no
/// remote call at all. Without an attended terminal, `--yes` is the only way
/// through.
pub fn confirm_destructive(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }

    if !console::user_attended() {
        return Err(miette::miette!(
            "refusing destructive action without confirmation; re-run with --yes"
        ));
    }

    Confirm::with_theme(&theme())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .into_diagnostic()
}

/// Prompt for a required text field; empty input is re-prompted
pub fn prompt_required(label: &str) -> Result<String> {
    let value: String = Input::with_theme(&theme())
        .with_prompt(label)
        .validate_with(|input: &String| {
            if input.trim().is_empty() {
                Err("this field is required")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .into_diagnostic()?;
    Ok(value.trim().to_string())
}

/// Prompt for an optional text field; empty means "leave unset"
pub fn prompt_optional(label: &str, current: Option<&str>) -> Result<Option<String>> {
    // The builder borrows the theme for its whole lifetime, so it needs a
    // named binding here.
    let theme = theme();
    let mut input = Input::with_theme(&theme)
        .with_prompt(label)
        .allow_empty(true);
    if let Some(current) = current {
        input = input.default(current.to_string());
    }
    let value: String = input.interact_text().into_diagnostic()?;
    let value = value.trim().to_string();
    Ok((!value.is_empty()).then_some(value))
}

/// Select from a list of labels, returning the chosen index
pub fn select_label(label: &str, options: &[String], default: usize) -> Result<usize> {
    Select::with_theme(&theme())
        .with_prompt(label)
        .items(options)
        .default(default.min(options.len().saturating_sub(1)))
        .interact()
        .into_diagnostic()
}

/// Pick a category, then a subcategory constrained to it.
///
/// Changing the category mid-form drops any previously chosen subcategory:
/// only the subcategories of the final category are ever offered. When the
/// chosen category has none, the subcategory stays unset.
pub fn select_category_pair<'a>(
    categories: &'a [Category],
    subcategories: &'a [SubCategory],
) -> Result<(&'a Category, Option<&'a SubCategory>)> {
    if categories.is_empty() {
        return Err(miette::miette!(
            "no categories exist yet; create one with {}",
            style("vit category new").yellow()
        ));
    }

    let labels: Vec<String> = categories.iter().map(|c| c.name.clone()).collect();
    let idx = select_label("Category", &labels, 0)?;
    let category = &categories[idx];

    let allowed = allowed_subcategories(subcategories, &category.id);
    if allowed.is_empty() {
        return Ok((category, None));
    }

    let mut sub_labels: Vec<String> = allowed.iter().map(|s| s.name.clone()).collect();
    sub_labels.push("(none)".to_string());
    let sub_idx = select_label("Subcategory", &sub_labels, 0)?;

    let subcategory = allowed.get(sub_idx).copied();
    Ok((category, subcategory))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Interactive prompts themselves need a TTY; what is testable here is the
    // no-TTY gate.
    #[test]
    fn test_assume_yes_short_circuits() {
        assert!(confirm_destructive("delete everything?", true).unwrap());
    }

    #[test]
    fn test_unattended_without_yes_is_refused() {
        if console::user_attended() {
            return; // can't exercise the no-TTY path under an attended terminal
        }
        let err = confirm_destructive("delete everything?", false).unwrap_err();
        assert!(err.to_string().contains("--yes"));
    }
}
