use std::sync::Arc;
use std::thread;

use rulecraft::{field, when, FieldInfo, FieldModel, ValueType};

fn main() {
    let age = FieldInfo::new("user.age", ValueType::Integer).readable("age");
    let status = FieldInfo::new("user.status", ValueType::String).readable("status");
    let rule = Arc::new(when(
        field(&age).gte(18_i64).and(field(&status).eq("active")),
    ));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let rule = Arc::clone(&rule);
            thread::spawn(move || {
                let model = FieldModel::new()
                    .with("user.age", 16_i64 + i64::from(i))
                    .with("user.status", "active");

                let result = rule.evaluate(&model);
                println!("Thread {i}: {result}");
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}
