// JSON data source and sink implementation
// Author: Gabriel Demetrios Lafis

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Map, Value as JsonValue};

use super::{DataError, DataSet, DataSink, DataSource, Record, SourceType, Value};

/// Convert a JSON value to a data value; nested arrays and objects keep their JSON text
pub fn json_to_value(json: &JsonValue) -> Value {
    match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Boolean(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => n.as_f64().map_or(Value::Null, Value::Float),
        },
        JsonValue::String(s) => Value::String(s.clone()),
        nested => Value::String(nested.to_string()),
    }
}

/// Convert a data value to a JSON value
pub fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Boolean(b) => JsonValue::Bool(*b),
        Value::Integer(i) => JsonValue::Number((*i).into()),
        Value::Float(f) => serde_json::Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
        Value::String(s) => JsonValue::String(s.clone()),
    }
}

impl Record {
    /// Build a record from a JSON object, keeping its key order
    pub fn from_json_object(obj: &Map<String, JsonValue>) -> Self {
        obj.iter().map(|(k, v)| (k.clone(), json_to_value(v))).collect()
    }

    /// Render the record as a JSON object
    pub fn to_json(&self) -> JsonValue {
        let obj: Map<String, JsonValue> = self
            .iter()
            .map(|(k, v)| (k.to_string(), value_to_json(v)))
            .collect();
        JsonValue::Object(obj)
    }
}

impl DataSet {
    /// Build a dataset from a parsed JSON document: an array of objects or a single object
    pub fn from_json(json: &JsonValue) -> Result<Self, DataError> {
        match json {
            JsonValue::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_object()
                        .map(Record::from_json_object)
                        .ok_or_else(|| DataError::ParseError("Array element is not an object".to_string()))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(DataSet::from_records),
            JsonValue::Object(obj) => Ok(DataSet::from_records(vec![Record::from_json_object(obj)])),
            _ => Err(DataError::ParseError(
                "JSON root must be an array of objects or an object".to_string(),
            )),
        }
    }

    /// Render the records as a JSON array
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Array(self.records.iter().map(Record::to_json).collect())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        value_to_json(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        JsonValue::deserialize(deserializer).map(|json| json_to_value(&json))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::<String, JsonValue>::deserialize(deserializer).map(|obj| Record::from_json_object(&obj))
    }
}

impl Serialize for DataSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for record in &self.records {
            seq.serialize_element(record)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for DataSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = JsonValue::deserialize(deserializer)?;
        match json {
            JsonValue::Array(_) => DataSet::from_json(&json).map_err(de::Error::custom),
            _ => Err(de::Error::custom("expected an array of records")),
        }
    }
}

/// JSON data source
pub struct JsonSource {
    path: String,
}

impl JsonSource {
    /// Create a new JSON data source
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        JsonSource {
            path: path.as_ref().to_string_lossy().to_string(),
        }
    }
}

impl DataSource for JsonSource {
    fn read(&self) -> Result<DataSet, DataError> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);

        let json: JsonValue = serde_json::from_reader(reader)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let mut dataset = DataSet::from_json(&json)?;

        dataset.metadata.add("source", "json");
        dataset.metadata.add("path", &self.path);

        Ok(dataset)
    }

    fn name(&self) -> &str {
        &self.path
    }

    fn source_type(&self) -> SourceType {
        SourceType::File
    }
}

/// JSON data sink
pub struct JsonSink {
    pretty: bool,
}

impl JsonSink {
    /// Create a new JSON data sink
    pub fn new(pretty: bool) -> Self {
        JsonSink { pretty }
    }
}

impl DataSink for JsonSink {
    fn write(&self, data: &DataSet, writer: &mut dyn std::io::Write) -> Result<(), DataError> {
        let result = if self.pretty {
            serde_json::to_writer_pretty(writer, data)
        } else {
            serde_json::to_writer(writer, data)
        };

        result.map_err(|e| DataError::ParseError(e.to_string()))
    }

    fn name(&self) -> &str {
        "json"
    }
}
