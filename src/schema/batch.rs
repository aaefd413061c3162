// In: src/schema/batch.rs

//! Columnar conversion between instances and Arrow `RecordBatch`es.
//!
//! The batch schema is `StorageSchema::to_arrow_schema`: compressed fields are
//! `Binary` columns holding the compressor output, every other field keeps its
//! native Arrow type. Rows go through the same `encode`/`decode` path as single
//! records, so both forms apply identical transforms.

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, BinaryArray, BooleanArray, Float32Array, Float64Array, Int16Array,
    Int32Array, Int64Array, Int8Array, StringArray, UInt16Array, UInt32Array, UInt64Array,
    UInt8Array,
};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};

use crate::error::PackratError;
use crate::schema::codec::FieldCodec;
use crate::schema::converter::SchemaConverter;
use crate::schema::definition::StorageStruct;
use crate::schema::record::StorageRecord;
use crate::schema::storage::SchemaEntry;
use crate::types::StorageType;

impl<'r> SchemaConverter<'r> {
    /// Encodes `instances` into a single `RecordBatch`, one row per instance.
    pub fn encode_batch<T: StorageStruct>(&self, instances: &[T]) -> Result<RecordBatch, PackratError> {
        let entries = &self.schema().entries;
        let mut columns: Vec<Vec<Vec<u8>>> = vec![Vec::with_capacity(instances.len()); entries.len()];

        for instance in instances {
            // `encode` emits cells in schema order.
            for (column, cell) in columns.iter_mut().zip(self.encode(instance)?.into_cells()) {
                column.push(cell.bytes);
            }
        }

        let arrays = entries
            .iter()
            .zip(columns)
            .map(|(entry, cells)| build_column(entry, &cells))
            .collect::<Result<Vec<_>, _>>()?;

        let options = RecordBatchOptions::new().with_row_count(Some(instances.len()));
        let batch = RecordBatch::try_new_with_options(
            Arc::new(self.schema().to_arrow_schema()),
            arrays,
            &options,
        )?;
        log::debug!(
            "packrat: encoded {} rows of {} into a batch",
            batch.num_rows(),
            self.schema().type_name
        );
        Ok(batch)
    }

    /// Decodes every row of `batch`. The batch's columns must match the schema
    /// by name and position.
    pub fn decode_batch<T: StorageStruct>(&self, batch: &RecordBatch) -> Result<Vec<T>, PackratError> {
        let entries = &self.schema().entries;
        let batch_schema = batch.schema();
        let batch_names: Vec<&str> = batch_schema.fields().iter().map(|f| f.name().as_str()).collect();
        let schema_names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        if batch_names != schema_names {
            return Err(PackratError::FieldMismatch(format!(
                "{}: batch columns {:?} do not match schema fields {:?}",
                self.schema().type_name,
                batch_names,
                schema_names
            )));
        }

        let mut instances = Vec::with_capacity(batch.num_rows());
        for row in 0..batch.num_rows() {
            let mut record = StorageRecord::new();
            for (entry, column) in entries.iter().zip(batch.columns()) {
                record.push(entry.name.clone(), cell_bytes(entry, column.as_ref(), row)?);
            }
            instances.push(self.decode(&record)?);
        }
        Ok(instances)
    }
}

//==================================================================================
// Column Builders
//==================================================================================

fn typed_values<T: FieldCodec>(entry: &SchemaEntry, cells: &[Vec<u8>]) -> Result<Vec<T>, PackratError> {
    cells
        .iter()
        .map(|bytes| T::read_bytes(bytes).map_err(|e| e.in_field(&entry.name)))
        .collect()
}

fn build_column(entry: &SchemaEntry, cells: &[Vec<u8>]) -> Result<ArrayRef, PackratError> {
    if entry.compressor.is_some() {
        return Ok(Arc::new(BinaryArray::from_iter_values(cells.iter())));
    }

    let array: ArrayRef = match entry.storage_type {
        StorageType::Boolean => Arc::new(BooleanArray::from(typed_values::<bool>(entry, cells)?)),
        StorageType::Int8 => Arc::new(Int8Array::from(typed_values::<i8>(entry, cells)?)),
        StorageType::Int16 => Arc::new(Int16Array::from(typed_values::<i16>(entry, cells)?)),
        StorageType::Int32 => Arc::new(Int32Array::from(typed_values::<i32>(entry, cells)?)),
        StorageType::Int64 => Arc::new(Int64Array::from(typed_values::<i64>(entry, cells)?)),
        StorageType::UInt8 => Arc::new(UInt8Array::from(typed_values::<u8>(entry, cells)?)),
        StorageType::UInt16 => Arc::new(UInt16Array::from(typed_values::<u16>(entry, cells)?)),
        StorageType::UInt32 => Arc::new(UInt32Array::from(typed_values::<u32>(entry, cells)?)),
        StorageType::UInt64 => Arc::new(UInt64Array::from(typed_values::<u64>(entry, cells)?)),
        StorageType::Float32 => Arc::new(Float32Array::from(typed_values::<f32>(entry, cells)?)),
        StorageType::Float64 => Arc::new(Float64Array::from(typed_values::<f64>(entry, cells)?)),
        StorageType::Utf8 => Arc::new(StringArray::from(typed_values::<String>(entry, cells)?)),
        StorageType::Binary => Arc::new(BinaryArray::from_iter_values(cells.iter())),
    };
    Ok(array)
}

//==================================================================================
// Column Readers
//==================================================================================

fn downcast<'a, A: Array + 'static>(column: &'a dyn Array, entry: &SchemaEntry) -> Result<&'a A, PackratError> {
    column.as_any().downcast_ref::<A>().ok_or_else(|| {
        PackratError::FieldMismatch(format!(
            "column '{}' has Arrow type {:?}, expected {:?}",
            entry.name,
            column.data_type(),
            entry.arrow_type()
        ))
    })
}

/// Reads the stored bytes of `row`: compressor output for compressed columns,
/// the field's canonical bytes otherwise.
fn cell_bytes(entry: &SchemaEntry, column: &dyn Array, row: usize) -> Result<Vec<u8>, PackratError> {
    if column.is_null(row) {
        return Err(PackratError::FieldMismatch(format!(
            "column '{}' is null at row {}",
            entry.name, row
        )));
    }
    if entry.compressor.is_some() {
        return Ok(downcast::<BinaryArray>(column, entry)?.value(row).to_vec());
    }

    let bytes = match entry.storage_type {
        StorageType::Boolean => downcast::<BooleanArray>(column, entry)?.value(row).to_field_bytes(),
        StorageType::Int8 => downcast::<Int8Array>(column, entry)?.value(row).to_field_bytes(),
        StorageType::Int16 => downcast::<Int16Array>(column, entry)?.value(row).to_field_bytes(),
        StorageType::Int32 => downcast::<Int32Array>(column, entry)?.value(row).to_field_bytes(),
        StorageType::Int64 => downcast::<Int64Array>(column, entry)?.value(row).to_field_bytes(),
        StorageType::UInt8 => downcast::<UInt8Array>(column, entry)?.value(row).to_field_bytes(),
        StorageType::UInt16 => downcast::<UInt16Array>(column, entry)?.value(row).to_field_bytes(),
        StorageType::UInt32 => downcast::<UInt32Array>(column, entry)?.value(row).to_field_bytes(),
        StorageType::UInt64 => downcast::<UInt64Array>(column, entry)?.value(row).to_field_bytes(),
        StorageType::Float32 => downcast::<Float32Array>(column, entry)?.value(row).to_field_bytes(),
        StorageType::Float64 => downcast::<Float64Array>(column, entry)?.value(row).to_field_bytes(),
        StorageType::Utf8 => downcast::<StringArray>(column, entry)?.value(row).as_bytes().to_vec(),
        StorageType::Binary => downcast::<BinaryArray>(column, entry)?.value(row).to_vec(),
    };
    Ok(bytes)
}
