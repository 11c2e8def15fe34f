use anyhow::Result;
use depslint::validation::{FieldLevel, field_set};

pub fn fields_command(level: Option<FieldLevel>) -> Result<()> {
    match level {
        None => {
            list_fields(FieldLevel::Top);
            println!();
            list_fields(FieldLevel::Element);
        }
        Some(level) => list_fields(level),
    }

    Ok(())
}

fn list_fields(level: FieldLevel) {
    match level {
        FieldLevel::Top => println!("Declaration fields:"),
        FieldLevel::Element => println!("Element declaration fields:"),
    }

    let set = field_set(level);
    let width = set.rules().iter().map(|r| r.name.len()).max().unwrap_or(0);
    for rule in set.rules() {
        let shape = rule.shape.map(|s| s.describe()).unwrap_or("any");
        println!("  {:width$}  {shape}", rule.name);
    }
}
