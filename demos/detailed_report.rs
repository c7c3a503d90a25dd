use rulecraft::{
    always_true, field, match_any, render_report, when, EnglishLabels, EvalOptions, FieldInfo,
    FieldModel, ValueType,
};

fn main() {
    let age = FieldInfo::new("user.age", ValueType::Integer).readable("age");
    let status = FieldInfo::new("user.status", ValueType::String).readable("status");
    let region = FieldInfo::new("request.region", ValueType::String).readable("region");

    let rule = when(
        field(&age)
            .gte(18_i64)
            .and(field(&status).eq("active"))
            .and(match_any(vec![
                field(&region).starts_with("us-"),
                field(&region).eq("eu-west"),
                always_true("fallback"),
            ])),
    );

    let model = FieldModel::new()
        .with("user.age", 25_i64)
        .with("user.status", "active")
        .with("request.region", "us-east");

    println!("Short-circuit evaluation:");
    print!("{}", render_report(&rule.evaluate(&model), &EnglishLabels));
    println!();

    let full = EvalOptions::new().short_circuit(false);
    let result = rule.evaluate_with(&model, &full);
    println!("Full evaluation:");
    print!("{}", render_report(&result, &EnglishLabels));
    println!();
    println!("{result}");
}
