use rulecraft::{field, when, FieldInfo, FieldModel, ValueType};

fn main() {
    // Describe the fields rules can read
    let age = FieldInfo::new("user.age", ValueType::Integer).readable("age");
    let status = FieldInfo::new("user.status", ValueType::String).readable("status");

    // Define the rule
    let rule = when(field(&age).gte(18_i64).and(field(&status).eq("active")));

    println!("{}", rule.metadata());

    // Evaluate against a data model
    let model = FieldModel::new()
        .with("user.age", 25_i64)
        .with("user.status", "active");

    let result = rule.evaluate(&model);
    println!("Result: {result}");
}
