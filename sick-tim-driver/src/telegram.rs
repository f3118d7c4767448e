use crate::constants::{
    IDX_ANGULAR_STEP_WIDTH, IDX_COMMAND, IDX_COMMAND_TYPE, IDX_DEVICE_NUMBER, IDX_DEVICE_STATUS_1,
    IDX_DEVICE_STATUS_2, IDX_FIRST_SAMPLE, IDX_NUMBER_OF_DATA, IDX_SERIAL_NUMBER,
    IDX_TELEGRAM_COUNTER, IDX_TIME_OF_TRANSMISSION, IDX_TIME_SINCE_STARTUP, IDX_VERSION_NUMBER,
    MILLIMETERS_PER_METER, SCAN_DATA_COMMAND, SCAN_DATA_COMMAND_TYPE, TOKEN_SEPARATOR,
};
use crate::error::SickError;
use crate::numeric::{ascii, parse_field, parse_hex};
use sick_tim_data::{DeviceInfo, ScanRecord};

/// Decodes one frame payload.
///
/// Returns `Ok(None)` for telegrams that are not scan data, and for scan data
/// reported while the device status is not nominal. Scan-data telegrams that do
/// not fit the token grid are errors.
pub fn decode_telegram(frame: &[u8]) -> Result<Option<ScanRecord>, SickError> {
    let tokens: Vec<&[u8]> = frame.split(|b| *b == TOKEN_SEPARATOR).collect();
    if !is_scan_data(&tokens) {
        return Ok(None);
    }
    if tokens.len() < IDX_FIRST_SAMPLE {
        return Err(SickError::TooFewTokens {
            expected: IDX_FIRST_SAMPLE,
            actual: tokens.len(),
        });
    }

    let device = DeviceInfo {
        version_number: parse_field(tokens[IDX_VERSION_NUMBER], "VersionNumber")?,
        device_number: parse_field(tokens[IDX_DEVICE_NUMBER], "DeviceNumber")?,
        serial_number: ascii(tokens[IDX_SERIAL_NUMBER], "SerialNumber")?.to_string(),
        device_status_1: parse_field(tokens[IDX_DEVICE_STATUS_1], "DeviceStatus1")?,
        device_status_2: parse_field(tokens[IDX_DEVICE_STATUS_2], "DeviceStatus2")?,
    };
    let telegram_counter = parse_field(tokens[IDX_TELEGRAM_COUNTER], "TelegramCounter")?;
    let time_since_startup = parse_field(tokens[IDX_TIME_SINCE_STARTUP], "TimeSinceStartup")?;
    let time_of_transmission =
        parse_field(tokens[IDX_TIME_OF_TRANSMISSION], "TimeOfTransmission")?;
    let angular_step_width = parse_field(tokens[IDX_ANGULAR_STEP_WIDTH], "AngularStepWidth")?;

    let declared = parse_field(tokens[IDX_NUMBER_OF_DATA], "NumberOfData")?;
    let available = tokens.len() - IDX_FIRST_SAMPLE;
    let number_of_data = match usize::try_from(declared) {
        Ok(n) if n <= available => n,
        _ => return Err(SickError::SampleCountMismatch { declared, available }),
    };
    let data = tokens[IDX_FIRST_SAMPLE..IDX_FIRST_SAMPLE + number_of_data]
        .iter()
        .map(|token| parse_hex(token, "Data").map(|mm| mm as f64 / MILLIMETERS_PER_METER))
        .collect::<Result<Vec<_>, _>>()?;

    if !device.is_nominal() {
        return Ok(None);
    }

    Ok(Some(ScanRecord {
        command_type: SCAN_DATA_COMMAND_TYPE.to_string(),
        command: SCAN_DATA_COMMAND.to_string(),
        device,
        telegram_counter,
        time_since_startup,
        time_of_transmission,
        angular_step_width,
        number_of_data,
        data,
    }))
}

fn is_scan_data(tokens: &[&[u8]]) -> bool {
    tokens.get(IDX_COMMAND_TYPE) == Some(&SCAN_DATA_COMMAND_TYPE.as_bytes())
        && tokens.get(IDX_COMMAND) == Some(&SCAN_DATA_COMMAND.as_bytes())
}


#[cfg(test)]
mod tests {
    use super::fixtures::scan_telegram;
    use super::*;

    #[test]
    fn test_decode_scan_data() {
        let frame = scan_telegram("0", "0", &["1A", "2B", "3C"]);
        let record = decode_telegram(&frame).unwrap().unwrap();
        assert_eq!(record.command_type, "sSN");
        assert_eq!(record.command, "LMDscandata");
        assert_eq!(record.device.version_number, 1);
        assert_eq!(record.device.device_number, 1);
        assert_eq!(record.device.serial_number, "B9A4F1");
        assert_eq!(record.telegram_counter, 0x5B2);
        assert_eq!(record.time_since_startup, 0x8A5E6A3);
        assert_eq!(record.time_of_transmission, 0x8A5F0A9);
        assert_eq!(record.angular_step_width, 0xD05);
        assert_eq!(record.number_of_data, 3);
        assert_eq!(
            record.data,
            vec![0x1A as f64 / 1000., 0x2B as f64 / 1000., 0x3C as f64 / 1000.]
        );
        assert_eq!(record.data.len(), record.number_of_data);
    }

    #[test]
    fn test_signed_decimal_fields() {
        let mut text = String::from_utf8(scan_telegram("0", "0", &["1A"])).unwrap();
        // Version and device number sent as signed decimal.
        text = text.replacen("LMDscandata 1 1", "LMDscandata +12 -3", 1);
        let record = decode_telegram(text.as_bytes()).unwrap().unwrap();
        assert_eq!(record.device.version_number, 12);
        assert_eq!(record.device.device_number, -3);
    }

    #[test]
    fn test_not_applicable_telegrams() {
        assert_eq!(decode_telegram(b"sEA LMDscandata 1").unwrap(), None);
        assert_eq!(decode_telegram(b"sRA STlms 7 0 8 16:40:27").unwrap(), None);
        assert_eq!(decode_telegram(b"").unwrap(), None);

        let frame = scan_telegram("0", "0", &["1A"]);
        let renamed = String::from_utf8(frame).unwrap().replacen("LMDscandata", "LMDscandatamon", 1);
        assert_eq!(decode_telegram(renamed.as_bytes()).unwrap(), None);

        let frame = scan_telegram("1", "0", &["1A"]);
        assert_eq!(decode_telegram(&frame).unwrap(), None);
        let frame = scan_telegram("0", "+4", &["1A"]);
        assert_eq!(decode_telegram(&frame).unwrap(), None);
    }

    #[test]
    fn test_too_few_tokens() {
        let err = decode_telegram(b"sSN LMDscandata 1 1 B9A4F1 0 0").unwrap_err();
        assert!(matches!(
            err,
            SickError::TooFewTokens {
                expected: 26,
                actual: 7
            }
        ));
    }

    #[test]
    fn test_sample_count_exceeds_tokens() {
        let frame = scan_telegram("0", "0", &["1A", "2B"]);
        let text = String::from_utf8(frame).unwrap().replacen(" D05 2 ", " D05 FF ", 1);
        let err = decode_telegram(text.as_bytes()).unwrap_err();
        // 2 samples and 6 trailing tokens
        assert!(matches!(
            err,
            SickError::SampleCountMismatch {
                declared: 255,
                available: 8
            }
        ));

        let text = text.replacen(" D05 FF ", " D05 -1 ", 1);
        assert!(matches!(
            decode_telegram(text.as_bytes()),
            Err(SickError::SampleCountMismatch { declared: -1, .. })
        ));
    }

    #[test]
    fn test_invalid_numbers() {
        let frame = scan_telegram("0", "0", &["1A", "+43", "3C"]);
        assert!(matches!(
            decode_telegram(&frame),
            Err(SickError::InvalidNumber { field: "Data", .. })
        ));

        let frame = scan_telegram("0", "0", &["1A", "G0", "3C"]);
        assert!(matches!(
            decode_telegram(&frame),
            Err(SickError::InvalidNumber { field: "Data", .. })
        ));

        let frame = scan_telegram("zz", "0", &["1A"]);
        assert!(matches!(
            decode_telegram(&frame),
            Err(SickError::InvalidNumber {
                field: "DeviceStatus1",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_samples() {
        let frame = scan_telegram("0", "0", &[]);
        let record = decode_telegram(&frame).unwrap().unwrap();
        assert_eq!(record.number_of_data, 0);
        assert!(record.data.is_empty());
    }
}
