use crate::compiler::{default_literal, quote_ident};
use crate::{compile_to_sql, generate_relational_ddl, SqlOptions};
use schemaflow_model::{
    Cardinality, DocumentType, Entity, Field, FieldMapping, Relationship, SqlType,
};

fn users() -> Entity {
    Entity::relational("1", "users")
        .with_field(Field::new("f1", "id", SqlType::Int).primary_key())
        .with_field(Field::new("f2", "email", SqlType::Varchar).unique())
}

fn posts() -> Entity {
    Entity::relational("2", "posts")
        .with_field(Field::new("f3", "id", SqlType::Int).primary_key())
        .with_field(Field::new("f4", "user_id", SqlType::Int))
}

fn posts_to_users() -> Relationship {
    Relationship::new("e1", "2", "1")
        .with_mapping(FieldMapping::new("user_id", "id", Cardinality::OneToMany))
}

#[test]
fn test_simple_create_table() {
    let sql = generate_relational_ddl(&[users()], &[]);

    println!("Generated DDL:\n{}", sql);

    assert!(sql.contains("CREATE TABLE IF NOT EXISTS `users`"));
    assert!(sql.contains("`id` INT NOT NULL AUTO_INCREMENT"));
    assert!(sql.contains("`email` VARCHAR(255) NOT NULL UNIQUE"));
    assert!(sql.contains("PRIMARY KEY (`id`)"));
}

#[test]
fn test_table_layout() {
    let sql = generate_relational_ddl(&[users()], &[]);

    let expected = "CREATE TABLE IF NOT EXISTS `users` (\n  `id` INT NOT NULL AUTO_INCREMENT,\n  `email` VARCHAR(255) NOT NULL UNIQUE,\n  PRIMARY KEY (`id`)\n);\n";
    assert_eq!(sql, expected);
}

#[test]
fn test_foreign_key_from_relationship() {
    let sql = generate_relational_ddl(&[users(), posts()], &[posts_to_users()]);

    println!("Generated DDL:\n{}", sql);

    assert!(sql.contains("ALTER TABLE `posts`"));
    assert!(sql.contains("ADD CONSTRAINT `fk_posts_user_id`"));
    assert!(sql.contains("FOREIGN KEY (`user_id`) REFERENCES `users` (`id`)"));
}

#[test]
fn test_creates_come_before_alters() {
    let sql = generate_relational_ddl(&[users(), posts()], &[posts_to_users()]);

    let last_create = sql.rfind("CREATE TABLE").unwrap();
    let first_alter = sql.find("ALTER TABLE").unwrap();
    assert!(last_create < first_alter);

    let users_at = sql.find("`users` (").unwrap();
    let posts_at = sql.find("`posts` (").unwrap();
    assert!(users_at < posts_at);
}

#[test]
fn test_statements_separated_by_blank_line() {
    let sql = generate_relational_ddl(&[users(), posts()], &[posts_to_users()]);

    assert!(!sql.starts_with('\n'));
    assert!(!sql.contains("\n\n\n"));
    assert_eq!(sql.matches(");\n\n").count(), 2);
}

#[test]
fn test_nullable_and_defaults() {
    let entity = Entity::relational("1", "settings")
        .with_field(Field::new("a", "theme", SqlType::Varchar).nullable().with_default("dark"))
        .with_field(Field::new("b", "retries", SqlType::Int).with_default("3"))
        .with_field(Field::new("c", "created", SqlType::Timestamp).with_default("current_timestamp"))
        .with_field(Field::new("d", "note", SqlType::Text).nullable().with_default("NULL"));

    let sql = generate_relational_ddl(&[entity], &[]);

    assert!(sql.contains("`theme` VARCHAR(255) DEFAULT 'dark'"));
    assert!(sql.contains("`retries` INT NOT NULL DEFAULT 3"));
    assert!(sql.contains("`created` TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP"));
    assert!(sql.contains("`note` TEXT DEFAULT NULL"));
    assert!(!sql.contains("PRIMARY KEY"));
}

#[test]
fn test_type_parameters() {
    let entity = Entity::relational("1", "items")
        .with_field(Field::new("a", "code", SqlType::Char).with_length(400))
        .with_field(Field::new("b", "title", SqlType::Varchar).with_length(80))
        .with_field(Field::new("c", "price", SqlType::Decimal))
        .with_field(Field::new("d", "status", SqlType::Enum))
        .with_field(Field::new("e", "payload", SqlType::Json));

    let options = SqlOptions {
        default_string_length: 100,
        decimal_precision: (12, 4),
        ..Default::default()
    };
    let sql = compile_to_sql(&[entity], &[], &options);

    assert!(sql.contains("`code` CHAR(255)"));
    assert!(sql.contains("`title` VARCHAR(80)"));
    assert!(sql.contains("`price` DECIMAL(12,4)"));
    assert!(sql.contains("`status` VARCHAR(100)"));
    assert!(sql.contains("`payload` JSON"));
}

#[test]
fn test_missing_or_document_types_fall_back_to_text() {
    let mut untyped = Field::new("a", "blob", SqlType::Int);
    untyped.data_type = None;

    let entity = Entity::relational("1", "misc")
        .with_field(untyped)
        .with_field(Field::new("b", "owner", DocumentType::ObjectId));

    let sql = generate_relational_ddl(&[entity], &[]);

    assert!(sql.contains("`blob` TEXT NOT NULL"));
    assert!(sql.contains("`owner` TEXT NOT NULL"));
}

#[test]
fn test_composite_primary_key_has_no_auto_increment() {
    let entity = Entity::relational("1", "memberships")
        .with_field(Field::new("a", "user_id", SqlType::Int).primary_key())
        .with_field(Field::new("b", "group_id", SqlType::Int).primary_key());

    let sql = generate_relational_ddl(&[entity], &[]);

    assert!(!sql.contains("AUTO_INCREMENT"));
    assert!(sql.contains("PRIMARY KEY (`user_id`, `group_id`)"));
}

#[test]
fn test_string_primary_key_has_no_auto_increment() {
    let entity = Entity::relational("1", "countries")
        .with_field(Field::new("a", "code", SqlType::Char).with_length(2).primary_key().nullable());

    let sql = generate_relational_ddl(&[entity], &[]);

    assert!(sql.contains("`code` CHAR(2) NOT NULL,"));
    assert!(!sql.contains("AUTO_INCREMENT"));
}

#[test]
fn test_primary_key_is_not_marked_unique() {
    let entity = Entity::relational("1", "users")
        .with_field(Field::new("a", "id", SqlType::Int).primary_key().unique());

    let sql = generate_relational_ddl(&[entity], &[]);
    assert!(!sql.contains("UNIQUE"));
}

#[test]
fn test_table_without_fields_is_skipped() {
    let empty = Entity::relational("3", "drafts");
    let sql = generate_relational_ddl(&[empty, users()], &[]);

    assert!(sql.contains("-- Skipped `drafts`: no columns"));
    assert!(!sql.contains("CREATE TABLE IF NOT EXISTS `drafts`"));
    assert!(sql.contains("CREATE TABLE IF NOT EXISTS `users`"));
}

#[test]
fn test_empty_names_get_placeholders() {
    let entity = Entity::relational("1", "")
        .with_field(Field::new("a", "", SqlType::Int))
        .with_field(Field::new("b", "label", SqlType::Text));

    let sql = generate_relational_ddl(&[entity], &[]);

    assert!(sql.contains("CREATE TABLE IF NOT EXISTS `table_1`"));
    assert!(sql.contains("`column_1` INT NOT NULL"));
}

#[test]
fn test_identifiers_escape_backticks() {
    assert_eq!(quote_ident("odd`name"), "`odd``name`");

    let entity = Entity::relational("1", "we`ird").with_field(Field::new("a", "id", SqlType::Int));
    let sql = generate_relational_ddl(&[entity], &[]);
    assert!(sql.contains("`we``ird`"));
}

#[test]
fn test_default_literals() {
    assert_eq!(default_literal("42"), "42");
    assert_eq!(default_literal("-1.5"), "-1.5");
    assert_eq!(default_literal("true"), "TRUE");
    assert_eq!(default_literal("hello"), "'hello'");
    assert_eq!(default_literal("it's"), "'it''s'");
    assert_eq!(default_literal("'quoted'"), "'quoted'");
    assert_eq!(default_literal("1.2.3"), "'1.2.3'");
    assert_eq!(default_literal("'it''s'"), "'it''s'");
    assert_eq!(default_literal("''"), "''");
    assert_eq!(default_literal(""), "''");
}

#[test]
fn test_without_if_not_exists() {
    let options = SqlOptions {
        if_not_exists: false,
        ..Default::default()
    };
    let sql = compile_to_sql(&[users()], &[], &options);

    assert!(sql.starts_with("CREATE TABLE `users` ("));
}

#[test]
fn test_colliding_constraint_names_are_suffixed() {
    let relationships = vec![posts_to_users(), {
        let mut again = posts_to_users();
        again.id = "e2".to_string();
        again
    }];

    let sql = generate_relational_ddl(&[users(), posts()], &relationships);

    assert!(sql.contains("ADD CONSTRAINT `fk_posts_user_id`\n"));
    assert!(sql.contains("ADD CONSTRAINT `fk_posts_user_id_2`\n"));
}

#[test]
fn test_self_reference() {
    let employees = Entity::relational("1", "employees")
        .with_field(Field::new("a", "id", SqlType::Int).primary_key())
        .with_field(Field::new("b", "manager_id", SqlType::Int).nullable());
    let relationship = Relationship::new("r1", "1", "1")
        .with_mapping(FieldMapping::new("manager_id", "id", Cardinality::ManyToOne));

    let sql = generate_relational_ddl(&[employees], &[relationship]);

    assert!(sql.contains("ALTER TABLE `employees`"));
    assert!(sql.contains("FOREIGN KEY (`manager_id`) REFERENCES `employees` (`id`);"));
}

#[test]
fn test_unresolvable_relationships_are_skipped() {
    let collection = Entity::document("9", "logs")
        .with_field(Field::new("x", "user_id", DocumentType::ObjectId));

    let relationships = vec![
        // Unknown column
        Relationship::new("r1", "2", "1")
            .with_mapping(FieldMapping::new("author_id", "id", Cardinality::OneToMany)),
        // Missing endpoint
        Relationship::new("r2", "2", "404")
            .with_mapping(FieldMapping::new("user_id", "id", Cardinality::OneToMany)),
        // Document endpoint
        Relationship::new("r3", "9", "1")
            .with_mapping(FieldMapping::new("user_id", "id", Cardinality::OneToMany)),
    ];

    let sql = generate_relational_ddl(&[users(), posts(), collection], &relationships);

    assert!(!sql.contains("ALTER TABLE"));
    assert!(!sql.contains("`logs`"));
}

#[test]
fn test_empty_input() {
    assert_eq!(generate_relational_ddl(&[], &[]), "");
}

#[test]
fn test_malformed_quoted_defaults_are_requoted() {
    assert_eq!(default_literal("'a'b'"), "'''a''b'''");
    assert_eq!(default_literal("'"), "''''");
    assert_eq!(default_literal("'a\\'"), "'''a\\\\'''");

    let entity = Entity::relational("1", "notes")
        .with_field(Field::new("a", "body", SqlType::Varchar).with_default("'a'b'"));
    let sql = generate_relational_ddl(&[entity], &[]);

    assert!(sql.contains("`body` VARCHAR(255) NOT NULL DEFAULT '''a''b'''"));
}

#[test]
fn test_duplicate_table_names_are_suffixed() {
    let first = Entity::relational("1", "users").with_field(Field::new("a", "id", SqlType::Int));
    let second = Entity::relational("2", "users").with_field(Field::new("b", "id", SqlType::Int));

    let sql = generate_relational_ddl(&[first, second], &[]);

    assert_eq!(sql.matches("CREATE TABLE IF NOT EXISTS `users` (").count(), 1);
    assert!(sql.contains("CREATE TABLE IF NOT EXISTS `users_2` ("));
}

#[test]
fn test_placeholder_table_name_does_not_clash() {
    let unnamed = Entity::relational("1", "").with_field(Field::new("a", "id", SqlType::Int));
    let named = Entity::relational("2", "table_1").with_field(Field::new("b", "id", SqlType::Int));

    let sql = generate_relational_ddl(&[unnamed, named], &[]);

    assert_eq!(sql.matches("CREATE TABLE IF NOT EXISTS `table_1` (").count(), 1);
    assert!(sql.contains("CREATE TABLE IF NOT EXISTS `table_1_2` ("));
}

#[test]
fn test_foreign_key_uses_deduplicated_table_name() {
    let users = Entity::relational("1", "users")
        .with_field(Field::new("a", "id", SqlType::Int).primary_key());
    let other_users = Entity::relational("2", "users")
        .with_field(Field::new("b", "id", SqlType::Int).primary_key())
        .with_field(Field::new("c", "parent_id", SqlType::Int).nullable());
    let relationship = Relationship::new("r1", "2", "2")
        .with_mapping(FieldMapping::new("parent_id", "id", Cardinality::ManyToOne));

    let sql = generate_relational_ddl(&[users, other_users], &[relationship]);

    assert!(sql.contains("ALTER TABLE `users_2`"));
    assert!(sql.contains("ADD CONSTRAINT `fk_users_2_parent_id`"));
    assert!(sql.contains("REFERENCES `users_2` (`id`);"));
}
