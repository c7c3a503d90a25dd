use std::io::{self, Write};

use rulecraft::{
    count, field, script_bindings, when, FieldInfo, FieldModel, RulecraftError, TemporalUnit,
    ValueType,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), RulecraftError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let born = FieldInfo::new("user.birthdate", ValueType::Date).readable("born");
    let tags = FieldInfo::new("user.tags", ValueType::List)
        .readable("tags")
        .generic(ValueType::String);
    let name = FieldInfo::new("user.name", ValueType::String).readable("name");

    let rule = when(
        field(&born)
            .plus(18, TemporalUnit::Years)
            .before(rulecraft::today())
            .and(
                count(vec![
                    field(&tags).any_match(["vip", "staff"]),
                    field(&name).matches("^[A-Z]"),
                ])
                .gte(1),
            ),
    );

    let model = FieldModel::new()
        .with("user.birthdate", chrono::NaiveDate::from_ymd_opt(1990, 5, 17).unwrap_or_default())
        .with("user.tags", vec!["staff"])
        .with("user.name", "O'Brien");

    let mut out = io::stdout().lock();
    let bindings = script_bindings(rule.metadata(), &[born, tags, name], &model)?;
    out.write_all(bindings.as_bytes())?;
    rule.write_script(&mut out)?;
    writeln!(out)?;
    Ok(())
}
