use crate::MongooseOptions;
use schemaflow_common::{is_js_identifier, model_name, CompilerContext, UniqueNames};
use schemaflow_model::{DocumentType, Entity, Field};

/// Generate Mongoose schemas with default options
pub fn generate_document_schemas(entities: &[Entity]) -> String {
    compile_to_mongoose(entities, &MongooseOptions::default())
}

/// Compile the document entities of a diagram to Mongoose schemas and models
pub fn compile_to_mongoose(entities: &[Entity], options: &MongooseOptions) -> String {
    let ctx = CompilerContext::new();

    if options.include_requires {
        compile_requires(&ctx);
    }

    // Model names also bind `<Model>Schema`; neither may shadow the preamble
    let mut names = UniqueNames::new("");
    names.reserve("mongoose");
    names.reserve("Schema");
    let mut models = Vec::new();

    for (i, entity) in entities.iter().filter(|e| e.is_document()).enumerate() {
        let base = match model_name(&entity.name) {
            name if name.is_empty() => format!("Model{}", i + 1),
            name => name,
        };
        let model = names.claim_with(&base, &["Schema"]);

        compile_schema(entity, &model, &ctx);
        models.push(model);
    }

    if options.include_exports && !models.is_empty() {
        ctx.separate();
        ctx.add_line(&format!("module.exports = {{ {} }};", models.join(", ")));
    }

    ctx.get_output()
}

fn compile_requires(ctx: &CompilerContext) {
    ctx.add_line("const mongoose = require('mongoose');");
    ctx.add_line("const { Schema } = mongoose;");
}

fn compile_schema(entity: &Entity, model: &str, ctx: &CompilerContext) {
    ctx.separate();

    let properties: Vec<(usize, &Field)> = entity
        .fields
        .iter()
        .enumerate()
        // MongoDB adds _id itself
        .filter(|(_, field)| field.name != "_id")
        .collect();

    if properties.is_empty() {
        ctx.add_line(&format!("const {}Schema = new Schema({{}});", model));
    } else {
        ctx.add_line(&format!("const {}Schema = new Schema({{", model));
        ctx.indent();
        for (i, field) in properties {
            compile_property(field, i + 1, ctx);
        }
        ctx.dedent();
        ctx.add_line("});");
    }

    ctx.separate();
    ctx.add_line(&format!(
        "const {} = mongoose.model({}, {}Schema);",
        model,
        js_string(model),
        model
    ));
}

fn compile_property(field: &Field, position: usize, ctx: &CompilerContext) {
    let key = if field.name.is_empty() {
        format!("field_{}", position)
    } else if is_js_identifier(&field.name) {
        field.name.clone()
    } else {
        js_string(&field.name)
    };

    ctx.add_line(&format!("{}: {{", key));
    ctx.indent();

    ctx.add_line(&format!("type: {},", property_type(field)));
    if !field.is_nullable {
        ctx.add_line("required: true,");
    }
    if field.is_unique {
        ctx.add_line("unique: true,");
    }
    if let Some(value) = &field.default_value {
        ctx.add_line(&format!("default: {},", default_literal(value)));
    }

    ctx.dedent();
    ctx.add_line("},");
}

fn property_type(field: &Field) -> &'static str {
    match field.data_type.and_then(|t| t.as_document()) {
        Some(DocumentType::ObjectId) => "Schema.Types.ObjectId",
        Some(DocumentType::Decimal128) => "Schema.Types.Decimal128",
        Some(DocumentType::Uuid) => "Schema.Types.UUID",
        Some(other) => other.name(),
        None => {
            tracing::debug!(field = %field.name, "no document type, falling back to Mixed");
            "Schema.Types.Mixed"
        }
    }
}

/// Single-quoted JS string literal
pub(crate) fn js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Numbers, booleans and null are emitted raw; anything else as a string
pub(crate) fn default_literal(value: &str) -> String {
    let trimmed = value.trim();

    if matches!(trimmed, "true" | "false" | "null") {
        return trimmed.to_string();
    }

    let unsigned = trimmed.strip_prefix('-').unwrap_or(trimmed);
    let is_number = match unsigned.split_once('.') {
        Some((whole, fraction)) => all_digits(whole) && all_digits(fraction),
        None => all_digits(unsigned),
    };
    if is_number {
        return trimmed.to_string();
    }

    js_string(value)
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}
