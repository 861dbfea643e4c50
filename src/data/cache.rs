use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::errors::ParquetError;
use thiserror::Error;

use super::model::{AggregatedRow, Algorithm, ResultTable, COLUMNS};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O")]
    Io(#[from] std::io::Error),

    #[error("cache encoding")]
    Parquet(#[from] ParquetError),

    #[error("cache batch")]
    Arrow(#[from] ArrowError),

    #[error("cache columns {found:?} do not match the expected {expected:?}")]
    Schema {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("cache column '{column}' is not {expected}")]
    ColumnType {
        column: &'static str,
        expected: &'static str,
    },

    #[error("cache column '{column}' has a null at row {row}")]
    Null { column: &'static str, row: usize },
}

/// Arrow schema of the cached table: the aggregated columns in order.
pub fn table_schema() -> SchemaRef {
    let fields: Vec<Field> = COLUMNS
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let ty = match i {
                0 => DataType::Utf8,
                1 | 2 | 5 => DataType::Int64,
                _ => DataType::Float64,
            };
            Field::new(*name, ty, false)
        })
        .collect();
    Arc::new(Schema::new(fields))
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

fn float_column(table: &ResultTable, f: impl Fn(&AggregatedRow) -> f64) -> ArrayRef {
    Arc::new(Float64Array::from_iter_values(table.rows.iter().map(f)))
}

fn int_column(table: &ResultTable, f: impl Fn(&AggregatedRow) -> i64) -> ArrayRef {
    Arc::new(Int64Array::from_iter_values(table.rows.iter().map(f)))
}

fn to_record_batch(table: &ResultTable) -> Result<RecordBatch, ArrowError> {
    let algorithm: ArrayRef = Arc::new(StringArray::from_iter_values(
        table.rows.iter().map(|r| r.algorithm.id()),
    ));
    let columns = vec![
        algorithm,
        int_column(table, |r| r.sources as i64),
        int_column(table, |r| r.mics as i64),
        float_column(table, |r| r.rt60),
        float_column(table, |r| r.sinr),
        int_column(table, |r| r.seed),
        float_column(table, |r| r.runtime),
        float_column(table, |r| r.sdr),
        float_column(table, |r| r.sir),
        float_column(table, |r| r.sdr_improvement),
        float_column(table, |r| r.sir_improvement),
    ];
    RecordBatch::try_new(table_schema(), columns)
}

/// Persist the aggregated table, replacing any previous cache.
pub fn write_cache(path: &Path, table: &ResultTable) -> Result<(), CacheError> {
    let batch = to_record_batch(table)?;
    let file = std::fs::File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;
    log::info!("Wrote {} rows to cache {}", table.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

fn column<'a, T: 'static>(
    batch: &'a RecordBatch,
    idx: usize,
    expected: &'static str,
) -> Result<&'a T, CacheError> {
    let col = batch.column(idx);
    if col.null_count() > 0 {
        let row = (0..col.len()).find(|&r| col.is_null(r)).unwrap_or(0);
        return Err(CacheError::Null {
            column: COLUMNS[idx],
            row,
        });
    }
    col.as_any()
        .downcast_ref::<T>()
        .ok_or(CacheError::ColumnType {
            column: COLUMNS[idx],
            expected,
        })
}

fn to_u32(v: i64, idx: usize) -> Result<u32, CacheError> {
    u32::try_from(v).map_err(|_| CacheError::ColumnType {
        column: COLUMNS[idx],
        expected: "a non-negative 32-bit count",
    })
}

fn append_rows(batch: &RecordBatch, rows: &mut Vec<AggregatedRow>) -> Result<(), CacheError> {
    let found: Vec<String> = batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    if found != COLUMNS {
        return Err(CacheError::Schema {
            expected: COLUMNS.iter().map(|s| s.to_string()).collect(),
            found,
        });
    }

    let algorithm = column::<StringArray>(batch, 0, "a string")?;
    let sources = column::<Int64Array>(batch, 1, "Int64")?;
    let mics = column::<Int64Array>(batch, 2, "Int64")?;
    let rt60 = column::<Float64Array>(batch, 3, "Float64")?;
    let sinr = column::<Float64Array>(batch, 4, "Float64")?;
    let seed = column::<Int64Array>(batch, 5, "Int64")?;
    let runtime = column::<Float64Array>(batch, 6, "Float64")?;
    let sdr = column::<Float64Array>(batch, 7, "Float64")?;
    let sir = column::<Float64Array>(batch, 8, "Float64")?;
    let sdr_improvement = column::<Float64Array>(batch, 9, "Float64")?;
    let sir_improvement = column::<Float64Array>(batch, 10, "Float64")?;

    for i in 0..batch.num_rows() {
        rows.push(AggregatedRow {
            algorithm: Algorithm::from(algorithm.value(i).to_string()),
            sources: to_u32(sources.value(i), 1)?,
            mics: to_u32(mics.value(i), 2)?,
            rt60: rt60.value(i),
            sinr: sinr.value(i),
            seed: seed.value(i),
            runtime: runtime.value(i),
            sdr: sdr.value(i),
            sir: sir.value(i),
            sdr_improvement: sdr_improvement.value(i),
            sir_improvement: sir_improvement.value(i),
        });
    }
    Ok(())
}

/// Load a table previously written by [`write_cache`].
pub fn read_cache(path: &Path) -> Result<ResultTable, CacheError> {
    let file = std::fs::File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut rows = Vec::new();
    for batch in reader {
        append_rows(&batch?, &mut rows)?;
    }
    log::info!("Read {} rows from cache {}", rows.len(), path.display());
    Ok(ResultTable::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_path(name: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "mbss_plot_cache_{}_{}_{}.parquet",
            name,
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        path
    }

    fn sample_table() -> ResultTable {
        ResultTable::new(vec![
            AggregatedRow {
                algorithm: Algorithm::OverIvaLaplace,
                sources: 2,
                mics: 4,
                rt60: 0.3,
                sinr: 10.0,
                seed: 123_456_789,
                runtime: f64::NAN,
                sdr: 7.25,
                sir: 12.5,
                sdr_improvement: 3.0,
                sir_improvement: -0.5,
            },
            AggregatedRow {
                algorithm: Algorithm::Other("ilrma_t".into()),
                sources: 1,
                mics: 2,
                rt60: 0.0,
                sinr: 5.0,
                seed: -1,
                runtime: 0.125,
                sdr: 1.0,
                sir: 2.0,
                sdr_improvement: 0.0,
                sir_improvement: 0.0,
            },
        ])
    }

    #[test]
    fn schema_follows_column_order() {
        let schema = table_schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names, COLUMNS);
        assert_eq!(schema.field(1).data_type(), &DataType::Int64);
        assert_eq!(schema.field(6).data_type(), &DataType::Float64);
    }

    #[test]
    fn cache_round_trip_preserves_table() {
        let path = unique_path("round_trip");
        let table = sample_table();

        write_cache(&path, &table).unwrap();
        let back = read_cache(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(back.len(), table.len());
        assert_eq!(back.column_names(), table.column_names());
        for (a, b) in back.rows.iter().zip(&table.rows) {
            assert_eq!(a.algorithm, b.algorithm);
            assert_eq!((a.sources, a.mics, a.seed), (b.sources, b.mics, b.seed));
            assert_eq!(a.rt60.to_bits(), b.rt60.to_bits());
            assert_eq!(a.runtime.is_nan(), b.runtime.is_nan());
            if !b.runtime.is_nan() {
                assert_eq!(a.runtime, b.runtime);
            }
            assert_eq!(a.sdr, b.sdr);
            assert_eq!(a.sir_improvement, b.sir_improvement);
        }
    }

    #[test]
    fn empty_table_round_trips() {
        let path = unique_path("empty");
        write_cache(&path, &ResultTable::default()).unwrap();
        let back = read_cache(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(back.is_empty());
    }

    #[test]
    fn missing_cache_is_an_io_error() {
        let err = read_cache(&unique_path("missing")).unwrap_err();
        assert!(matches!(err, CacheError::Io(_)));
    }
}
