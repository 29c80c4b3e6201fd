#[cfg(test)]
mod tests {
    use quarry::{AsValue, Value};
    use rust_decimal::Decimal;
    use std::{cmp::Ordering, str::FromStr};
    use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};
    use uuid::Uuid;

    fn text(value: impl AsValue) -> String {
        value.as_value().to_text().expect("Value is null").into_owned()
    }

    #[test]
    fn value_null() {
        assert_eq!(Value::Null, Value::Null);
        assert_ne!(Value::Float32(Some(1.0)), Value::Null);
        assert_ne!(Value::Int32(None), Value::Null);
        assert!(Value::Int32(None).is_null());
        assert!(Value::Null.is_null());
        assert!(!Value::Int32(Some(0)).is_null());
        assert_eq!(Value::Varchar(Some("x".into())).as_null(), Value::Varchar(None));
        assert!(Value::Int32(None).same_type(&Value::Int32(Some(5))));
        assert!(!Value::Int32(None).same_type(&Value::Int64(Some(5))));
        assert_eq!(Value::Null.to_text(), None);
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Uuid(None).to_string(), "null");
        assert_eq!(Option::<i32>::None.as_value(), Value::Int32(None));
        assert!(<Option<String> as AsValue>::NULLABLE);
        assert!(!<String as AsValue>::NULLABLE);
    }

    #[test]
    fn value_bool() {
        let val = true.as_value();
        assert_eq!(val, Value::Boolean(Some(true)));
        assert_ne!(val, Value::Varchar(Some("true".into())));
        assert_eq!(bool::try_from_value(val).unwrap(), true);
        assert_eq!(bool::try_from_value(1_i8.as_value()).unwrap(), true);
        assert_eq!(bool::try_from_value(0_u64.as_value()).unwrap(), false);
        assert_eq!(bool::try_from_value(Value::from("Yes")).unwrap(), true);
        assert_eq!(bool::parse(" OFF ").unwrap(), false);
        assert_eq!(bool::parse("t").unwrap(), true);
        assert!(bool::parse("hello").is_err());
        assert!(bool::parse("").is_err());
        assert!(bool::try_from_value(Value::Boolean(None)).is_err());
        assert!(bool::try_from_value(Value::Date(None)).is_err());
        assert_eq!(text(false), "false");
    }

    #[test]
    fn value_integers() {
        assert_eq!(127_i8.as_value(), Value::Int8(Some(127)));
        assert_eq!(i16::try_from_value(Value::Int8(Some(-5))).unwrap(), -5);
        assert_eq!(i32::try_from_value(Value::UInt16(Some(65535))).unwrap(), 65535);
        assert_eq!(i64::try_from_value(Value::Boolean(Some(true))).unwrap(), 1);
        assert_eq!(
            i64::try_from_value(Value::Decimal(Some(Decimal::new(500, 2)))).unwrap(),
            5
        );
        assert_eq!(u64::try_from_value(Value::from(" 42 ")).unwrap(), 42);
        assert_eq!(u32::parse("4294967295").unwrap(), u32::MAX);
        assert!(i8::try_from_value(Value::Int64(Some(300))).is_err());
        assert!(u8::try_from_value(Value::Int32(Some(-1))).is_err());
        assert!(i32::try_from_value(Value::Float64(Some(1.0))).is_err());
        assert!(i64::try_from_value(Value::Decimal(Some(Decimal::new(55, 1)))).is_err());
        assert!(i64::try_from_value(Value::Int64(None)).is_err());
        assert!(i16::parse("1.5").is_err());
        assert!(u16::parse("-1").is_err());
        assert_eq!(text(-9_223_372_036_854_775_808_i64), "-9223372036854775808");
        assert_eq!(text(u64::MAX), "18446744073709551615");
        assert_eq!(Option::<i32>::try_from_value(Value::Null).unwrap(), None);
        assert_eq!(
            Option::<i32>::try_from_value(Value::Int64(Some(7))).unwrap(),
            Some(7)
        );
        assert_eq!(Option::<i32>::parse("NULL").unwrap(), None);
    }

    #[test]
    fn value_floats() {
        assert_eq!(1.5_f32.as_value(), Value::Float32(Some(1.5)));
        assert_eq!(f64::try_from_value(Value::Int32(Some(3))).unwrap(), 3.0);
        assert_eq!(f64::try_from_value(Value::Float32(Some(0.25))).unwrap(), 0.25);
        assert_eq!(f32::try_from_value(Value::from("2.5")).unwrap(), 2.5);
        assert_eq!(
            f64::try_from_value(Value::Decimal(Some(Decimal::new(125, 2)))).unwrap(),
            1.25
        );
        assert!(f64::try_from_value(Value::Boolean(Some(true))).is_err());
        assert!(f64::parse("abc").is_err());
        assert_eq!(text(0.1_f64), "0.1");
        assert_eq!(text(1e21_f64), "1e21");
        assert_eq!(text(3.0_f32), "3.0");
    }

    #[test]
    fn value_decimal() {
        let value = Decimal::from_str("1.10").unwrap();
        assert_eq!(value.as_value(), Value::Decimal(Some(value)));
        assert_eq!(text(value), "1.1");
        assert_eq!(
            Decimal::try_from_value(Value::Float64(Some(2.5))).unwrap(),
            Decimal::new(25, 1)
        );
        assert_eq!(
            Decimal::try_from_value(Value::Int64(Some(3))).unwrap(),
            Decimal::from(3)
        );
        assert_eq!(
            Decimal::try_from_value(Value::from("-0.001")).unwrap(),
            Decimal::new(-1, 3)
        );
        assert!(Decimal::try_from_value(Value::Float64(Some(f64::NAN))).is_err());
        assert!(<Decimal as AsValue>::parse("1,5").is_err());
    }

    #[test]
    fn value_text() {
        assert_eq!('x'.as_value(), Value::Char(Some('x')));
        assert_eq!(char::try_from_value(Value::from("y")).unwrap(), 'y');
        assert!(char::try_from_value(Value::from("yz")).is_err());
        assert!(char::parse("").is_err());
        assert_eq!("hello".to_string().as_value(), Value::Varchar(Some("hello".into())));
        assert_eq!(Value::from("hello"), Value::Varchar(Some("hello".into())));
        assert_eq!(String::try_from_value(Value::Int32(Some(5))).unwrap(), "5");
        assert_eq!(String::try_from_value(Value::Char(Some('c'))).unwrap(), "c");
        assert!(String::try_from_value(Value::Null).is_err());
        assert_eq!(
            Option::<String>::try_from_value(Value::Varchar(None)).unwrap(),
            None
        );
    }

    #[test]
    fn value_blob() {
        let value = vec![0xde_u8, 0xad, 0xbe, 0xef];
        assert_eq!(
            value.clone().as_value(),
            Value::Blob(Some(value.clone().into_boxed_slice()))
        );
        assert_eq!(text(value.clone()), "deadbeef");
        assert_eq!(Vec::<u8>::try_from_value(Value::from("hi")).unwrap(), b"hi");
        assert_eq!(
            Box::<[u8]>::try_from_value(value.clone().as_value()).unwrap(),
            value.into_boxed_slice()
        );
        assert!(Vec::<u8>::try_from_value(Value::Int32(Some(1))).is_err());
    }

    #[test]
    fn value_date() {
        let date = Date::from_calendar_date(2024, Month::February, 29).unwrap();
        assert_eq!(date.as_value(), Value::Date(Some(date)));
        assert_eq!(text(date), "2024-02-29");
        assert_eq!(<Date as AsValue>::parse("2024-02-29").unwrap(), date);
        assert_eq!(Date::try_from_value(Value::from(" 2024-02-29 ")).unwrap(), date);
        assert!(<Date as AsValue>::parse("2023-02-29").is_err());
        assert!(<Date as AsValue>::parse("29/02/2024").is_err());
    }

    #[test]
    fn value_time() {
        let time = Time::from_hms_milli(12, 30, 5, 250).unwrap();
        assert_eq!(text(time), "12:30:05.25");
        assert_eq!(text(Time::from_hms(7, 0, 0).unwrap()), "07:00:00");
        assert_eq!(<Time as AsValue>::parse("12:30:05.25").unwrap(), time);
        assert_eq!(<Time as AsValue>::parse("12:30").unwrap(), Time::from_hms(12, 30, 0).unwrap());
        assert_eq!(Time::try_from_value(Value::from("12:30:05.25")).unwrap(), time);
        assert!(<Time as AsValue>::parse("25:00:00").is_err());
    }

    #[test]
    fn value_timestamps() {
        let date = Date::from_calendar_date(2025, Month::October, 3).unwrap();
        let timestamp = PrimitiveDateTime::new(date, Time::from_hms(8, 15, 0).unwrap());
        assert_eq!(text(timestamp), "2025-10-03 08:15:00");
        assert_eq!(
            <PrimitiveDateTime as AsValue>::parse("2025-10-03T08:15:00").unwrap(),
            timestamp
        );
        assert_eq!(
            PrimitiveDateTime::try_from_value(Value::from("2025-10-03 08:15")).unwrap(),
            timestamp
        );

        let offset = UtcOffset::from_hms(2, 0, 0).unwrap();
        let zoned = timestamp.assume_offset(offset);
        assert_eq!(text(zoned), "2025-10-03 08:15:00+02:00");
        assert_eq!(
            text(timestamp.assume_offset(UtcOffset::from_hms(-5, -30, 0).unwrap())),
            "2025-10-03 08:15:00-05:30"
        );
        assert_eq!(
            <OffsetDateTime as AsValue>::parse("2025-10-03 08:15:00+02:00").unwrap(),
            zoned
        );
        assert_eq!(
            <OffsetDateTime as AsValue>::parse("2025-10-03 08:15:00").unwrap(),
            timestamp.assume_utc()
        );
        // Zoned values read as timestamps are moved to UTC
        assert_eq!(
            PrimitiveDateTime::try_from_value(zoned.as_value()).unwrap(),
            PrimitiveDateTime::new(date, Time::from_hms(6, 15, 0).unwrap())
        );
        assert_eq!(
            OffsetDateTime::try_from_value(timestamp.as_value()).unwrap(),
            timestamp.assume_utc()
        );
    }

    #[test]
    fn value_uuid() {
        let uuid = Uuid::from_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert_eq!(uuid.as_value(), Value::Uuid(Some(uuid)));
        assert_eq!(text(uuid), "67e55044-10b1-426f-9247-bb680e5fe0c8");
        assert_eq!(
            Uuid::try_from_value(Value::from("67E55044-10B1-426F-9247-BB680E5FE0C8")).unwrap(),
            uuid
        );
        assert_eq!(
            Uuid::try_from_value(Value::Blob(Some(uuid.as_bytes().to_vec().into()))).unwrap(),
            uuid
        );
        assert!(<Uuid as AsValue>::parse("not-a-uuid").is_err());
    }

    #[test]
    fn comparisons() {
        assert!(Value::from(2).text_eq(&Value::from("2")));
        assert!(!Value::from(2).text_eq(&Value::Int32(None)));
        assert!(!Value::Null.text_eq(&Value::Null));
        assert_eq!(Value::from(10).compare(&Value::from("9")), Some(Ordering::Greater));
        assert_eq!(Value::from(1.5).compare(&Value::from(2u8)), Some(Ordering::Less));
        assert_eq!(Value::from("b").compare(&Value::from("a")), Some(Ordering::Greater));
        assert_eq!(Value::from("x").compare(&Value::Null), None);
        assert_eq!(Value::from("on").as_truth(), Some(true));
        assert_eq!(Value::from(0).as_truth(), Some(false));
        assert_eq!(Value::from("unknown").as_truth(), None);
        assert_eq!(Value::Date(None).as_truth(), None);
    }

    #[test]
    fn serde_round_trip() {
        let values = [
            Value::Null,
            Value::Boolean(Some(true)),
            Value::Int8(None),
            Value::Int64(Some(-42)),
            Value::UInt64(Some(u64::MAX)),
            Value::Float64(Some(0.5)),
            Value::Decimal(Some(Decimal::new(-1234, 2))),
            Value::Char(Some('q')),
            Value::Varchar(Some("text".into())),
            Value::Blob(Some(vec![1, 2, 3].into())),
            Value::Date(Some(Date::from_calendar_date(2000, Month::January, 1).unwrap())),
            Value::Uuid(Some(Uuid::nil())),
        ];
        for value in values {
            let json = serde_json::to_string(&value).unwrap();
            let back: Value = serde_json::from_str(&json).unwrap();
            assert_eq!(back, value, "{json}");
        }
    }
}
