use crate::SqlOptions;
use schemaflow_common::{CompilerContext, UniqueNames};
use schemaflow_model::{Entity, Field, Relationship, SqlType};
use std::collections::HashMap;

/// A relational entity with its resolved table and column names
struct Table<'a> {
    entity: &'a Entity,
    name: String,
    columns: Vec<String>,
}

impl<'a> Table<'a> {
    fn new(entity: &'a Entity, position: usize, table_names: &mut UniqueNames) -> Self {
        let name = if entity.name.is_empty() {
            table_names.claim(&format!("table_{}", position))
        } else {
            table_names.claim(&entity.name)
        };

        let columns = entity
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                if field.name.is_empty() {
                    format!("column_{}", i + 1)
                } else {
                    field.name.clone()
                }
            })
            .collect();

        Self {
            entity,
            name,
            columns,
        }
    }

    /// Resolved column name of the field called `field_name`
    fn column_named(&self, field_name: &str) -> Option<&str> {
        self.entity
            .fields
            .iter()
            .position(|f| f.name == field_name)
            .map(|i| self.columns[i].as_str())
    }

    fn primary_key_columns(&self) -> Vec<&str> {
        self.entity
            .fields
            .iter()
            .zip(&self.columns)
            .filter(|(field, _)| field.is_primary_key)
            .map(|(_, column)| column.as_str())
            .collect()
    }
}

/// Generate MySQL DDL with default options
pub fn generate_relational_ddl(entities: &[Entity], relationships: &[Relationship]) -> String {
    compile_to_sql(entities, relationships, &SqlOptions::default())
}

/// Compile the relational entities and relationships of a diagram to MySQL DDL
pub fn compile_to_sql(
    entities: &[Entity],
    relationships: &[Relationship],
    options: &SqlOptions,
) -> String {
    let ctx = CompilerContext::new();

    let mut table_names = UniqueNames::new("_");
    let tables: Vec<Table> = entities
        .iter()
        .filter(|e| e.is_relational())
        .enumerate()
        .map(|(i, entity)| Table::new(entity, i + 1, &mut table_names))
        .collect();

    let mut by_id: HashMap<&str, &Table> = HashMap::new();
    for table in &tables {
        by_id.entry(table.entity.id.as_str()).or_insert(table);
    }

    for table in &tables {
        compile_table(table, &ctx, options);
    }

    let mut constraint_names = UniqueNames::new("_");
    for relationship in relationships {
        compile_foreign_keys(relationship, &by_id, &mut constraint_names, &ctx);
    }

    ctx.get_output()
}

fn compile_table(table: &Table, ctx: &CompilerContext, options: &SqlOptions) {
    ctx.separate();

    if table.entity.fields.is_empty() {
        tracing::debug!(table = %table.name, "skipping table without columns");
        ctx.add_line(&format!("-- Skipped {}: no columns", quote_ident(&table.name)));
        return;
    }

    let primary_keys = table.primary_key_columns();
    let auto_increment_allowed = primary_keys.len() == 1;

    let create = if options.if_not_exists {
        "CREATE TABLE IF NOT EXISTS"
    } else {
        "CREATE TABLE"
    };
    ctx.add_line(&format!("{} {} (", create, quote_ident(&table.name)));
    ctx.indent();

    let mut lines: Vec<String> = table
        .entity
        .fields
        .iter()
        .zip(&table.columns)
        .map(|(field, column)| compile_column(field, column, auto_increment_allowed, options))
        .collect();

    if !primary_keys.is_empty() {
        let keys: Vec<String> = primary_keys.iter().map(|c| quote_ident(c)).collect();
        lines.push(format!("PRIMARY KEY ({})", keys.join(", ")));
    }

    let last = lines.len() - 1;
    for (i, line) in lines.iter().enumerate() {
        if i < last {
            ctx.add_line(&format!("{},", line));
        } else {
            ctx.add_line(line);
        }
    }

    ctx.dedent();
    ctx.add_line(");");
}

fn compile_column(field: &Field, column: &str, auto_increment_allowed: bool, options: &SqlOptions) -> String {
    let sql_type = field.data_type.and_then(|t| t.as_sql());

    let mut parts = vec![quote_ident(column), column_type(field, sql_type, options)];

    if field.is_primary_key || !field.is_nullable {
        parts.push("NOT NULL".to_string());
    }

    let is_integer = sql_type.map(|t| t.is_integer()).unwrap_or(false);
    if field.is_primary_key && auto_increment_allowed && is_integer {
        parts.push("AUTO_INCREMENT".to_string());
    }

    if field.is_unique && !field.is_primary_key {
        parts.push("UNIQUE".to_string());
    }

    if let Some(value) = &field.default_value {
        parts.push(format!("DEFAULT {}", default_literal(value)));
    }

    parts.join(" ")
}

fn column_type(field: &Field, sql_type: Option<SqlType>, options: &SqlOptions) -> String {
    let length = field
        .length
        .filter(|l| *l > 0)
        .unwrap_or(options.default_string_length);

    match sql_type {
        // No value list is modelled for ENUM
        Some(SqlType::Varchar) | Some(SqlType::Enum) => format!("VARCHAR({})", length),
        Some(SqlType::Char) => format!("CHAR({})", length.min(255)),
        Some(SqlType::Decimal) => {
            let (precision, scale) = options.decimal_precision;
            format!("DECIMAL({},{})", precision, scale)
        }
        Some(other) => other.keyword().to_string(),
        None => {
            tracing::debug!(field = %field.name, "no relational type, falling back to TEXT");
            "TEXT".to_string()
        }
    }
}

fn compile_foreign_keys(
    relationship: &Relationship,
    tables: &HashMap<&str, &Table>,
    constraint_names: &mut UniqueNames,
    ctx: &CompilerContext,
) {
    let (Some(source), Some(target)) = (
        tables.get(relationship.source.as_str()),
        tables.get(relationship.target.as_str()),
    ) else {
        tracing::debug!(relationship = %relationship.id, "skipping relationship without relational endpoints");
        return;
    };

    for mapping in &relationship.field_mappings {
        let (Some(source_column), Some(target_column)) = (
            source.column_named(&mapping.source_field),
            target.column_named(&mapping.target_field),
        ) else {
            tracing::debug!(
                relationship = %relationship.id,
                source_field = %mapping.source_field,
                target_field = %mapping.target_field,
                "skipping unresolved field mapping"
            );
            continue;
        };

        let constraint = constraint_names.claim(&format!("fk_{}_{}", source.name, source_column));

        ctx.separate();
        ctx.add_line(&format!("ALTER TABLE {}", quote_ident(&source.name)));
        ctx.indent();
        ctx.add_line(&format!("ADD CONSTRAINT {}", quote_ident(&constraint)));
        ctx.add_line(&format!(
            "FOREIGN KEY ({}) REFERENCES {} ({});",
            quote_ident(source_column),
            quote_ident(&target.name),
            quote_ident(target_column)
        ));
        ctx.dedent();
    }
}

/// Backtick-quote an identifier, doubling embedded backticks
pub(crate) fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Render a DEFAULT value: keywords and numbers raw, anything else as a
/// string literal
pub(crate) fn default_literal(value: &str) -> String {
    let trimmed = value.trim();
    let upper = trimmed.to_ascii_uppercase();

    if matches!(
        upper.as_str(),
        "NULL" | "TRUE" | "FALSE" | "CURRENT_TIMESTAMP"
    ) {
        return upper;
    }

    if is_number(trimmed) {
        return trimmed.to_string();
    }

    if is_quoted_literal(trimmed) {
        return trimmed.to_string();
    }

    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "''"))
}

/// `'...'` whose inner quotes are all doubled and which has no backslash
/// escapes that could swallow the closing quote
fn is_quoted_literal(value: &str) -> bool {
    let Some(inner) = value
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    else {
        return false;
    };

    !inner.contains('\\') && !inner.replace("''", "").contains('\'')
}

fn is_number(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    let mut parts = digits.splitn(2, '.');
    let whole = parts.next().unwrap_or("");
    let fraction = parts.next();

    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());

    match fraction {
        Some(fraction) => all_digits(whole) && all_digits(fraction),
        None => all_digits(whole),
    }
}
