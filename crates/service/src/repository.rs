use async_trait::async_trait;
use models::record::value_as_text;
use models::{EntityDescriptor, FieldDescriptor, FieldMap, Identifier, Record, RecordId, SqlType};
use sea_orm::sea_query::{
    Alias, Asterisk, Condition, DeleteStatement, Expr, Func, LikeExpr, Order, Query, SelectStatement, SimpleExpr,
};
use sea_orm::{ConnectionTrait, DatabaseConnection, QueryResult, TransactionTrait};
use serde_json::Value;
use tracing::debug;

use crate::errors::ServiceError;

/// Persistence abstraction for one declared entity.
#[async_trait]
pub trait Repository: Send + Sync {
    fn descriptor(&self) -> &'static EntityDescriptor;

    async fn get_all(&self) -> Result<Vec<Record>, ServiceError>;
    async fn get_by_id(&self, id: &RecordId) -> Result<Option<Record>, ServiceError>;
    async fn create(&self, fields: FieldMap) -> Result<Record, ServiceError>;
    /// Overwrite only the supplied fields; `None` when the record is absent.
    async fn update(&self, id: &RecordId, fields: FieldMap) -> Result<Option<Record>, ServiceError>;
    async fn delete(&self, id: &RecordId) -> Result<bool, ServiceError>;
    /// One window of the (optionally filtered) extent plus the filtered total.
    async fn find_page(&self, filter: Option<&str>, offset: u64, limit: u64)
        -> Result<(Vec<Record>, u64), ServiceError>;
}

/// Reject payload keys the entity does not declare.
pub(crate) fn check_known_fields(descriptor: &EntityDescriptor, fields: &FieldMap) -> Result<(), ServiceError> {
    match fields.keys().find(|k| descriptor.field(k).is_none()) {
        Some(unknown) => Err(ServiceError::UnknownField(unknown.clone())),
        None => Ok(()),
    }
}

/// Case-insensitive substring match over the textual form of required fields.
pub(crate) fn matches_filter(descriptor: &EntityDescriptor, fields: &FieldMap, filter: &str) -> bool {
    descriptor.required_fields().any(|f| {
        fields
            .get(f.name)
            .and_then(value_as_text)
            .is_some_and(|text| text.to_lowercase().contains(filter))
    })
}

/// PostgreSQL-backed repository. Values are bound as text and cast to the
/// column type on write; columns are read back as text and decoded per type.
#[derive(Clone)]
pub struct SeaOrmRepository {
    db: DatabaseConnection,
    descriptor: &'static EntityDescriptor,
}

const MAX_WINDOW: u64 = i64::MAX as u64;

fn text_of(column: &str) -> SimpleExpr {
    Expr::col(Alias::new(column)).cast_as(Alias::new("text"))
}

fn bind(field: &FieldDescriptor, value: &Value) -> SimpleExpr {
    let text = value_as_text(value).map(|t| t.into_owned());
    Expr::val(text).cast_as(Alias::new(field.sql.cast_name()))
}

fn id_value(id: &RecordId) -> SimpleExpr {
    match id {
        RecordId::Serial(n) => Expr::val(*n).into(),
        RecordId::Natural(s) => Expr::val(s.clone()).into(),
    }
}

/// Postgres' canonical text is kept as-is (`numeric(10,2)` gives `10.00`);
/// only integer columns become JSON numbers.
fn decode(sql: SqlType, text: Option<String>) -> Value {
    match (sql, text) {
        (_, None) => Value::Null,
        (SqlType::Integer, Some(t)) => t.parse::<i64>().map(Value::from).unwrap_or(Value::String(t)),
        (_, Some(t)) => Value::String(t),
    }
}

fn escape_like(filter: &str) -> String {
    let mut out = String::with_capacity(filter.len() + 2);
    out.push('%');
    for c in filter.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

impl SeaOrmRepository {
    pub fn new(db: DatabaseConnection, descriptor: &'static EntityDescriptor) -> Self {
        Self { db, descriptor }
    }

    fn table(&self) -> (Alias, Alias) {
        (Alias::new(self.descriptor.binding.schema()), Alias::new(self.descriptor.table))
    }

    fn id_column(&self) -> Alias {
        Alias::new(self.descriptor.identifier.column())
    }

    fn by_id(&self, id: &RecordId) -> SimpleExpr {
        Expr::col(self.id_column()).eq(id_value(id))
    }

    fn select(&self) -> SelectStatement {
        let mut q = Query::select();
        q.from(self.table());
        if let Identifier::Serial { column } = self.descriptor.identifier {
            q.column(Alias::new(column));
        }
        for field in self.descriptor.fields {
            q.expr_as(text_of(field.name), Alias::new(field.name));
        }
        q
    }

    fn filter_condition(&self, filter: &str) -> Condition {
        let pattern = escape_like(filter);
        self.descriptor.required_fields().fold(Condition::any(), |cond, f| {
            cond.add(Expr::expr(Func::lower(text_of(f.name))).like(LikeExpr::new(pattern.clone()).escape('\\')))
        })
    }

    fn row_to_record(&self, row: &QueryResult) -> Result<Record, ServiceError> {
        let mut fields = FieldMap::new();
        for field in self.descriptor.fields {
            let text: Option<String> = row.try_get("", field.name)?;
            fields.insert(field.name.to_string(), decode(field.sql, text));
        }
        let identifier = &self.descriptor.identifier;
        let id = match identifier {
            Identifier::Serial { column } => RecordId::Serial(row.try_get("", column)?),
            // keys are trimmed on write, so the stored text is the key
            Identifier::Natural { field, .. } => match fields.get(*field) {
                Some(Value::String(key)) if !key.is_empty() => RecordId::Natural(key.clone()),
                _ => return Err(ServiceError::MissingIdentifier(field.to_string())),
            },
        };
        Ok(Record::new(id, fields))
    }

    async fn fetch<C: ConnectionTrait>(&self, conn: &C, id: &RecordId) -> Result<Option<Record>, ServiceError> {
        let mut q = self.select();
        q.and_where(self.by_id(id));
        let stmt = conn.get_database_backend().build(&q);
        match conn.query_one(stmt).await? {
            Some(row) => Ok(Some(self.row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    /// Declared fields present in the payload, in declared order.
    fn assignments(&self, fields: &FieldMap) -> Vec<(Alias, SimpleExpr)> {
        self.descriptor
            .fields
            .iter()
            .filter_map(|f| fields.get(f.name).map(|v| (Alias::new(f.name), bind(f, v))))
            .collect()
    }
}

#[async_trait]
impl Repository for SeaOrmRepository {
    fn descriptor(&self) -> &'static EntityDescriptor {
        self.descriptor
    }

    async fn get_all(&self) -> Result<Vec<Record>, ServiceError> {
        let mut q = self.select();
        q.order_by(self.id_column(), Order::Asc);
        let stmt = self.db.get_database_backend().build(&q);
        let rows = self.db.query_all(stmt).await?;
        rows.iter().map(|r| self.row_to_record(r)).collect()
    }

    async fn get_by_id(&self, id: &RecordId) -> Result<Option<Record>, ServiceError> {
        self.fetch(&self.db, id).await
    }

    async fn create(&self, mut fields: FieldMap) -> Result<Record, ServiceError> {
        check_known_fields(self.descriptor, &fields)?;
        let identifier = &self.descriptor.identifier;
        RecordId::normalize_key(identifier, &mut fields);
        let natural_id = match identifier {
            Identifier::Serial { .. } => None,
            Identifier::Natural { field, .. } => Some(
                RecordId::from_fields(identifier, &fields)
                    .ok_or_else(|| ServiceError::MissingIdentifier(field.to_string()))?,
            ),
        };

        let (columns, values): (Vec<Alias>, Vec<SimpleExpr>) = self.assignments(&fields).into_iter().unzip();
        let mut q = Query::insert();
        q.into_table(self.table());
        if columns.is_empty() {
            q.or_default_values();
        } else {
            q.columns(columns)
                .values(values)
                .map_err(|e| ServiceError::Store(e.to_string()))?;
        }
        q.returning_col(self.id_column());

        let txn = self.db.begin().await?;
        let stmt = txn.get_database_backend().build(&q);
        let row = txn
            .query_one(stmt)
            .await?
            .ok_or_else(|| ServiceError::Store("insert returned no row".into()))?;
        let id = match natural_id {
            Some(id) => id,
            None => RecordId::Serial(row.try_get_by_index::<i64>(0)?),
        };
        let record = self
            .fetch(&txn, &id)
            .await?
            .ok_or_else(|| ServiceError::Store(format!("inserted row {id} not readable")))?;
        txn.commit().await?;
        debug!(entity = self.descriptor.resource, id = %record.id, "row_inserted");
        Ok(record)
    }

    async fn update(&self, id: &RecordId, mut fields: FieldMap) -> Result<Option<Record>, ServiceError> {
        check_known_fields(self.descriptor, &fields)?;
        RecordId::normalize_key(&self.descriptor.identifier, &mut fields);
        let assignments = self.assignments(&fields);
        if assignments.is_empty() {
            return self.get_by_id(id).await;
        }
        // the natural key may itself be overwritten
        let new_id = RecordId::from_fields(&self.descriptor.identifier, &fields).unwrap_or_else(|| id.clone());

        let mut q = Query::update();
        q.table(self.table()).values(assignments).and_where(self.by_id(id));

        let txn = self.db.begin().await?;
        let stmt = txn.get_database_backend().build(&q);
        let res = txn.execute(stmt).await?;
        if res.rows_affected() == 0 {
            txn.rollback().await?;
            return Ok(None);
        }
        let record = self.fetch(&txn, &new_id).await?;
        txn.commit().await?;
        debug!(entity = self.descriptor.resource, id = %new_id, "row_updated");
        Ok(record)
    }

    async fn delete(&self, id: &RecordId) -> Result<bool, ServiceError> {
        let q: DeleteStatement = Query::delete().from_table(self.table()).and_where(self.by_id(id)).to_owned();
        let stmt = self.db.get_database_backend().build(&q);
        let res = self.db.execute(stmt).await?;
        Ok(res.rows_affected() > 0)
    }

    async fn find_page(
        &self,
        filter: Option<&str>,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Record>, u64), ServiceError> {
        let backend = self.db.get_database_backend();

        let mut count = Query::select();
        count.from(self.table()).expr_as(Func::count(Expr::col(Asterisk)), Alias::new("total"));
        if let Some(filter) = filter {
            count.cond_where(self.filter_condition(filter));
        }
        let total: i64 = match self.db.query_one(backend.build(&count)).await? {
            Some(row) => row.try_get("", "total")?,
            None => 0,
        };
        let total = total.max(0) as u64;

        // LIMIT and OFFSET bind as bigint
        if offset > MAX_WINDOW || offset >= total {
            return Ok((Vec::new(), total));
        }
        let mut page = self.select();
        if let Some(filter) = filter {
            page.cond_where(self.filter_condition(filter));
        }
        page.order_by(self.id_column(), Order::Asc).limit(limit.min(MAX_WINDOW)).offset(offset);

        let rows = self.db.query_all(backend.build(&page)).await?;
        let items = rows.iter().map(|r| self.row_to_record(r)).collect::<Result<Vec<_>, _>>()?;
        Ok((items, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::PageRequest;
    use crate::test_support::{db_tests_enabled, get_db};
    use models::{automoviles, clinica};
    use serde_json::json;

    fn fields(v: Value) -> FieldMap {
        v.as_object().cloned().unwrap()
    }

    fn marker() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    fn paciente(nombre: &str) -> FieldMap {
        paciente_en(nombre, "Calle 1")
    }

    fn paciente_en(nombre: &str, direccion: &str) -> FieldMap {
        fields(json!({
            "nombre": nombre,
            "direccion": direccion,
            "telefono": "5551234",
            "fecha_nacimiento": "1990-05-01",
            "historial_medico": "Sin antecedentes",
        }))
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(escape_like("50%_a"), "%50\\%\\_a%");
    }

    #[test]
    fn integer_columns_decode_to_numbers() {
        assert_eq!(decode(SqlType::Integer, Some("7".into())), json!(7));
        assert_eq!(decode(SqlType::Decimal(10, 2), Some("7.50".into())), json!("7.50"));
        assert_eq!(decode(SqlType::Date, None), Value::Null);
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        if !db_tests_enabled() {
            return;
        }
        let db = get_db().await.expect("db");
        let repo = SeaOrmRepository::new(db, &clinica::PACIENTE);
        let input = paciente(&format!("Ana {}", marker()));

        let created = repo.create(input.clone()).await.unwrap();
        let fetched = repo.get_by_id(&created.id).await.unwrap().expect("row exists");
        assert_eq!(fetched.fields, input);
        assert!(matches!(fetched.id, RecordId::Serial(_)));
    }

    #[tokio::test]
    async fn filter_matches_required_fields_case_insensitively() {
        if !db_tests_enabled() {
            return;
        }
        let db = get_db().await.expect("db");
        let repo = SeaOrmRepository::new(db, &clinica::PACIENTE);
        let tag = marker();
        repo.create(paciente(&format!("Ana {tag}"))).await.unwrap();
        repo.create(paciente(&format!("Luis {tag}"))).await.unwrap();

        let (items, total) = repo.find_page(Some(format!("ana {tag}").as_str()), 0, 10).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].get("nombre"), Some(&json!(format!("Ana {tag}"))));

        let (items, total) = repo.find_page(Some(tag.as_str()), 1, 1).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn filter_matches_any_required_field() {
        if !db_tests_enabled() {
            return;
        }
        let db = get_db().await.expect("db");
        let repo = SeaOrmRepository::new(db, &clinica::PACIENTE);
        let tag = marker();
        repo.create(paciente_en("Ana", &format!("Av. {tag}"))).await.unwrap();
        repo.create(paciente("Luis")).await.unwrap();

        let (items, total) = repo.find_page(Some(format!("av. {tag}").as_str()), 0, 10).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].get("nombre"), Some(&json!("Ana")));
    }

    #[tokio::test]
    async fn offsets_beyond_bigint_yield_an_empty_page() {
        if !db_tests_enabled() {
            return;
        }
        let db = get_db().await.expect("db");
        let repo = SeaOrmRepository::new(db, &clinica::PACIENTE);
        let tag = marker();
        repo.create(paciente(&format!("Ana {tag}"))).await.unwrap();

        let req = PageRequest::new(1 << 62, 4, Some(tag.as_str()));
        assert!(req.offset() > i64::MAX as u64);
        let (items, total) = repo.find_page(req.filter.as_deref(), req.offset(), req.page_size).await.unwrap();
        assert!(items.is_empty());
        assert_eq!(total, 1);

        let (items, _) = repo.find_page(Some(tag.as_str()), 0, u64::MAX).await.unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn store_normalizes_decimals_and_timestamps() {
        if !db_tests_enabled() {
            return;
        }
        let db = get_db().await.expect("db");
        let repo = SeaOrmRepository::new(db, &clinica::TRATAMIENTO);
        let created = repo
            .create(fields(json!({"nombre": format!("T {}", marker()), "descripcion": "Limpieza", "costo": "10"})))
            .await
            .unwrap();
        assert_eq!(created.get("costo"), Some(&json!("10.00")));

        let repo = SeaOrmRepository::new(repo.db.clone(), &automoviles::VEHICULO);
        let vin = marker()[..automoviles::VIN_LEN].to_uppercase();
        let created = repo
            .create(fields(json!({
                "vin": vin,
                "marca": "Ford",
                "modelo": "Ka",
                "anio": 2019,
                "color": "Blanco",
                "tipo": "Hatchback",
                "precio": 9000,
                "fecha_recepcion": "2024-03-15",
            })))
            .await
            .unwrap();
        assert_eq!(created.get("precio"), Some(&json!("9000.00")));
        assert_eq!(created.get("fecha_recepcion"), Some(&json!("2024-03-15 00:00:00")));
        assert!(repo.delete(&created.id).await.unwrap());
    }

    #[tokio::test]
    async fn update_is_partial_and_missing_rows_yield_none() {
        if !db_tests_enabled() {
            return;
        }
        let db = get_db().await.expect("db");
        let repo = SeaOrmRepository::new(db, &clinica::PACIENTE);
        let created = repo.create(paciente(&format!("Ana {}", marker()))).await.unwrap();

        let updated = repo
            .update(&created.id, fields(json!({"telefono": "5550000"})))
            .await
            .unwrap()
            .expect("updated");
        assert_eq!(updated.get("telefono"), Some(&json!("5550000")));
        assert_eq!(updated.get("nombre"), created.get("nombre"));

        let none = repo.update(&RecordId::Serial(-1), fields(json!({"telefono": "1"}))).await.unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_went_away() {
        if !db_tests_enabled() {
            return;
        }
        let db = get_db().await.expect("db");
        let repo = SeaOrmRepository::new(db, &clinica::PACIENTE);
        let created = repo.create(paciente(&format!("Ana {}", marker()))).await.unwrap();

        assert!(repo.delete(&created.id).await.unwrap());
        assert!(!repo.delete(&created.id).await.unwrap());
        assert!(repo.get_by_id(&created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn natural_key_entities_use_the_supplied_key() {
        if !db_tests_enabled() {
            return;
        }
        let db = get_db().await.expect("db");
        let repo = SeaOrmRepository::new(db, &automoviles::VEHICULO);
        let vin = marker()[..automoviles::VIN_LEN].to_uppercase();
        let input = fields(json!({
            "vin": vin,
            "marca": "Ford",
            "modelo": "Focus",
            "anio": 2020,
            "color": "Rojo",
            "tipo": "Sedan",
            "precio": "15000.00",
            "fecha_recepcion": "2024-03-15 00:00:00",
        }));

        let created = repo.create(input.clone()).await.unwrap();
        assert_eq!(created.id, RecordId::Natural(vin.clone()));
        assert_eq!(created.get("anio"), Some(&json!(2020)));

        let dup = repo.create(input).await.unwrap_err();
        assert!(matches!(dup, ServiceError::Constraint(_)));
        assert!(repo.delete(&created.id).await.unwrap());
    }

    #[tokio::test]
    async fn padded_natural_keys_are_stored_trimmed() {
        if !db_tests_enabled() {
            return;
        }
        let db = get_db().await.expect("db");
        let repo = SeaOrmRepository::new(db, &automoviles::VEHICULO);
        let vin = marker()[..10].to_string();
        let created = repo
            .create(fields(json!({
                "vin": format!("{vin} "),
                "marca": "Ford",
                "modelo": "Focus",
                "anio": 2020,
                "color": "Rojo",
                "tipo": "Sedan",
                "precio": "15000.00",
                "fecha_recepcion": "2024-03-15 00:00:00",
            })))
            .await
            .unwrap();
        assert_eq!(created.id, RecordId::Natural(vin.clone()));
        assert_eq!(created.get("vin"), Some(&json!(vin)));

        let updated = repo
            .update(&created.id, fields(json!({"vin": format!(" {vin}"), "color": "Azul"})))
            .await
            .unwrap()
            .expect("still addressable");
        assert_eq!(updated.id, created.id);
        assert!(repo.delete(&created.id).await.unwrap());
    }

    #[tokio::test]
    async fn dangling_reference_is_a_constraint_error() {
        if !db_tests_enabled() {
            return;
        }
        let db = get_db().await.expect("db");
        let repo = SeaOrmRepository::new(db, &clinica::CITA);
        let err = repo
            .create(fields(json!({
                "id_paciente": -1,
                "id_medico": -1,
                "fecha_hora": "2024-03-15 10:30:00",
                "motivo_visita": "Control",
            })))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Constraint(_)));
    }

    #[tokio::test]
    async fn unknown_fields_are_rejected_before_the_store() {
        if !db_tests_enabled() {
            return;
        }
        let db = get_db().await.expect("db");
        let repo = SeaOrmRepository::new(db, &clinica::PACIENTE);
        let mut input = paciente("Ana");
        input.insert("edad".into(), json!(30));
        let err = repo.create(input).await.unwrap_err();
        assert!(matches!(err, ServiceError::UnknownField(ref f) if f == "edad"));
    }
}
