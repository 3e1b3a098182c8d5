use csv::StringRecord;

use crate::tracks::{
    FieldParseError, FrameRecord, Kinematics, RawFrame, RowError, TrackKey, COLUMNS,
};

const RECORDING_ID: usize = 0;
const TRACK_ID: usize = 1;
const FRAME: usize = 2;
const X_CENTER: usize = 4;
const Y_CENTER: usize = 5;
const HEADING: usize = 6;
const WIDTH: usize = 7;
const HEIGHT: usize = 8;
const X_VELOCITY: usize = 9;

/// Checks the key and column count of one CSV row. Numeric columns are left as text.
pub fn parse_row(line: u64, fields: StringRecord) -> Result<RawFrame, RowError> {
    if fields.len() < COLUMNS.len() {
        return Err(RowError::MissingField {
            line,
            column: COLUMNS[fields.len()],
        });
    }

    let recording_id = required(&fields, RECORDING_ID, line)?;
    let track_id = required(&fields, TRACK_ID, line)?;
    let frame = fields.get(FRAME).and_then(|v| v.trim().parse().ok());

    Ok(RawFrame {
        line,
        key: TrackKey::new(recording_id, track_id),
        frame,
        fields,
    })
}

/// Converts the numeric columns of a row. Kinematic columns lose their sign.
pub fn parse_frame(raw: &RawFrame) -> Result<FrameRecord, FieldParseError> {
    let number = |index: usize| parse_f64(raw, index);
    let magnitude = |index: usize| parse_f64(raw, index).map(f64::abs);

    let track_id = raw.key.track_id.trim().parse::<i64>().map_err(|_| FieldParseError {
        line: raw.line,
        field: COLUMNS[TRACK_ID],
        value: raw.key.track_id.clone(),
    })?;

    Ok(FrameRecord {
        recording_id: raw.key.recording_id.clone(),
        track_id,
        frame: raw.frame,
        x_center: number(X_CENTER)?,
        y_center: number(Y_CENTER)?,
        heading: number(HEADING)?,
        width: number(WIDTH)?,
        height: number(HEIGHT)?,
        kinematics: Kinematics {
            x_velocity: magnitude(X_VELOCITY)?,
            y_velocity: magnitude(X_VELOCITY + 1)?,
            x_acceleration: magnitude(X_VELOCITY + 2)?,
            y_acceleration: magnitude(X_VELOCITY + 3)?,
            lon_velocity: magnitude(X_VELOCITY + 4)?,
            lat_velocity: magnitude(X_VELOCITY + 5)?,
            lon_acceleration: magnitude(X_VELOCITY + 6)?,
            lat_acceleration: magnitude(X_VELOCITY + 7)?,
        },
    })
}

/// Key columns are kept exactly as read; only blank values are rejected.
fn required(fields: &StringRecord, index: usize, line: u64) -> Result<String, RowError> {
    match fields.get(index) {
        Some(value) if !value.trim().is_empty() => Ok(value.to_string()),
        _ => Err(RowError::MissingField {
            line,
            column: COLUMNS[index],
        }),
    }
}

fn parse_f64(raw: &RawFrame, index: usize) -> Result<f64, FieldParseError> {
    let value = raw.fields.get(index).unwrap_or_default().trim();
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(FieldParseError {
            line: raw.line,
            field: COLUMNS[index],
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> StringRecord {
        StringRecord::from(values.to_vec())
    }

    fn full_row() -> StringRecord {
        row(&[
            "07", "12", "3", "3", "10.5", "-4.25", "90.0", "1.8", "4.5", "-2.0", "0.5", "-0.1",
            "0.2", "3.0", "-0.3", "-0.05", "0.01",
        ])
    }

    #[test]
    fn parses_key_and_frame() {
        let raw = parse_row(2, full_row()).unwrap();
        assert_eq!(raw.key, TrackKey::new("07", "12"));
        assert_eq!(raw.frame, Some(3));
        assert_eq!(raw.line, 2);
    }

    #[test]
    fn short_row_reports_first_missing_column() {
        let err = parse_row(5, row(&["07", "12", "3", "3", "10.5"])).unwrap_err();
        assert_eq!(
            err,
            RowError::MissingField {
                line: 5,
                column: "yCenter"
            }
        );
    }

    #[test]
    fn blank_key_is_missing() {
        let mut values: Vec<String> = full_row().iter().map(String::from).collect();
        values[1] = "  ".into();
        let err = parse_row(9, StringRecord::from(values)).unwrap_err();
        assert_eq!(
            err,
            RowError::MissingField {
                line: 9,
                column: "trackId"
            }
        );
    }

    #[test]
    fn key_is_kept_verbatim() {
        let mut values: Vec<String> = full_row().iter().map(String::from).collect();
        values[0] = " 07".into();
        values[1] = "12 ".into();
        let raw = parse_row(3, StringRecord::from(values)).unwrap();
        assert_eq!(raw.key, TrackKey::new(" 07", "12 "));
        assert_ne!(raw.key, parse_row(2, full_row()).unwrap().key);

        let frame = parse_frame(&raw).unwrap();
        assert_eq!(frame.recording_id, " 07");
        assert_eq!(frame.track_id, 12);
    }

    #[test]
    fn unparseable_frame_number_is_tolerated() {
        let mut values: Vec<String> = full_row().iter().map(String::from).collect();
        values[2] = "n/a".into();
        let raw = parse_row(1, StringRecord::from(values)).unwrap();
        assert_eq!(raw.frame, None);
    }

    #[test]
    fn kinematics_are_absolute() {
        let frame = parse_frame(&parse_row(2, full_row()).unwrap()).unwrap();
        assert_eq!(frame.track_id, 12);
        assert_eq!(frame.y_center, -4.25);
        assert_eq!(frame.kinematics.x_velocity, 2.0);
        assert_eq!(frame.kinematics.x_acceleration, 0.1);
        assert_eq!(frame.kinematics.lat_velocity, 0.3);
        assert_eq!(frame.kinematics.lon_acceleration, 0.05);
    }

    #[test]
    fn bad_number_names_the_field() {
        let mut values: Vec<String> = full_row().iter().map(String::from).collect();
        values[6] = "north".into();
        let raw = parse_row(4, StringRecord::from(values)).unwrap();
        let err = parse_frame(&raw).unwrap_err();
        assert_eq!(err.field, "heading");
        assert_eq!(err.value, "north");
        assert_eq!(err.line, 4);
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let mut values: Vec<String> = full_row().iter().map(String::from).collect();
        values[9] = "NaN".into();
        let raw = parse_row(4, StringRecord::from(values)).unwrap();
        assert_eq!(parse_frame(&raw).unwrap_err().field, "xVelocity");
    }

    #[test]
    fn non_integer_track_id_fails_conversion() {
        let mut values: Vec<String> = full_row().iter().map(String::from).collect();
        values[1] = "12a".into();
        let raw = parse_row(4, StringRecord::from(values)).unwrap();
        assert_eq!(parse_frame(&raw).unwrap_err().field, "trackId");
    }
}
