//! COPY INTO, stage and file format compilation.

use insta::assert_snapshot;

use snowflake_dialect::sql::{
    AwsBucket, AzureContainer, CopyFormatter, CopyInto, CreateFileFormat, CreateStage,
    CsvFormatter, ExternalStage, JsonFormatter, OptionError, RenderOptions, Statement, TableRef,
};

#[test]
fn test_copy_from_kms_encrypted_bucket_has_no_credentials() {
    let mut csv = CsvFormatter::new();
    csv.compression("auto").unwrap();
    let bucket = AwsBucket::from_uri("s3://backup")
        .unwrap()
        .encryption_aws_sse_kms(Some("1234abcd-12ab-34cd-56ef-1234567890ab"));

    let statement = Statement::from(CopyInto::new(TableRef::new("spanish"), bucket).formatter(csv));
    let compiled = statement.compile(RenderOptions::deterministic()).unwrap();

    assert_snapshot!(
        compiled.sql,
        @"COPY INTO spanish FROM 's3://backup' FILE_FORMAT=(TYPE=csv COMPRESSION='AUTO') ENCRYPTION=(KMS_KEY_ID='1234abcd-12ab-34cd-56ef-1234567890ab' TYPE='AWS_SSE_KMS')"
    );
    assert!(!compiled.sql.contains("CREDENTIALS"));
    assert_eq!(compiled.autocommit, Some(true));
}

#[test]
fn test_csv_options_sorted_in_deterministic_mode() {
    let mut csv = CsvFormatter::new();
    csv.skip_header(1)
        .null_if(&["", "NULL"])
        .field_delimiter(Some("|"))
        .unwrap()
        .compression("gzip")
        .unwrap();

    let copy = CopyInto::new("orders", ExternalStage::new("landing").with_namespace("raw"))
        .formatter(csv)
        .on_error("skip_file");

    assert_eq!(
        copy.to_sql(RenderOptions::deterministic()),
        "COPY INTO orders FROM @raw.landing \
         FILE_FORMAT=(TYPE=csv COMPRESSION='GZIP' FIELD_DELIMITER='|' NULL_IF=('', 'NULL') SKIP_HEADER=1) \
         ON_ERROR = 'skip_file'"
    );
    assert_eq!(
        copy.to_sql(RenderOptions::default()),
        "COPY INTO orders FROM @raw.landing \
         FILE_FORMAT=(TYPE=csv SKIP_HEADER=1 NULL_IF=('', 'NULL') FIELD_DELIMITER='|' COMPRESSION='GZIP') \
         ON_ERROR = 'skip_file'"
    );
}

#[test]
fn test_latest_credentials_win() {
    let bucket = AwsBucket::new("bucket", Some("exports/"))
        .credentials_role("arn:aws:iam::123456789012:role/old")
        .credentials_keys("AKIA", "secret", None);

    let copy = CopyInto::new(TableRef::new("events").with_schema("raw"), bucket);
    assert_eq!(
        copy.to_sql(RenderOptions::default()),
        "COPY INTO raw.events FROM 's3://bucket/exports' \
         CREDENTIALS=(AWS_KEY_ID='AKIA' AWS_SECRET_KEY='secret')"
    );
}

#[test]
fn test_unload_to_azure_with_json() {
    let container = AzureContainer::from_uri("azure://acct.blob.core.windows.net/exports/daily")
        .unwrap()
        .credentials("sv=2024&sig=abc");
    let mut json = JsonFormatter::new();
    json.strip_outer_array(true);

    let copy = CopyInto::new(container, "events")
        .formatter(json)
        .overwrite(true)
        .single(true);

    assert_eq!(
        copy.to_sql(RenderOptions::default()),
        "COPY INTO 'azure://acct.blob.core.windows.net/exports/daily' FROM events \
         FILE_FORMAT=(TYPE=json STRIP_OUTER_ARRAY=true) OVERWRITE = true SINGLE = true \
         CREDENTIALS=(AZURE_SAS_TOKEN='sv=2024&sig=abc')"
    );
}

#[test]
fn test_copy_percent_escaping_keeps_option_literals() {
    let copy = CopyInto::new("t", ExternalStage::new("s")).pattern(".*%.csv");
    let compiled = Statement::from(copy)
        .compile(RenderOptions::default().with_escape_percent(true))
        .unwrap();
    assert!(compiled.escape_percent);
    assert!(compiled.sql.starts_with("COPY INTO t FROM @s PATTERN = "));
}

#[test]
fn test_stage_references() {
    let stage = ExternalStage::new("name")
        .with_namespace("namespace")
        .with_path("prefix/path");
    assert_eq!(stage.to_sql(RenderOptions::default()), "@namespace.name/prefix/path");
    assert_eq!(ExternalStage::new("name").to_sql(RenderOptions::default()), "@name");
}

#[test]
fn test_create_stage_and_file_format_statements() {
    let container =
        AzureContainer::new("myaccount", "my-container", None).credentials("saas_token");
    let stage: Statement = CreateStage::new(
        ExternalStage::new("AZURE_STAGE").with_namespace("MY_DB.MY_SCHEMA"),
        container,
    )
    .or_replace()
    .into();

    let compiled = stage.compile(RenderOptions::deterministic()).unwrap();
    assert_snapshot!(
        compiled.sql,
        @"CREATE OR REPLACE STAGE MY_DB.MY_SCHEMA.AZURE_STAGE URL='azure://myaccount.blob.core.windows.net/my-container' CREDENTIALS=(AZURE_SAS_TOKEN='saas_token')"
    );
    assert_eq!(compiled.autocommit, None);

    let mut csv = CsvFormatter::new();
    csv.field_delimiter(Some(",")).unwrap().skip_header(1);
    let format: Statement = CreateFileFormat::new("MY_DB.MY_SCHEMA.CSV_FORMAT", csv)
        .or_replace()
        .into();
    assert_eq!(
        format.render(RenderOptions::deterministic()).unwrap(),
        "CREATE OR REPLACE FILE FORMAT MY_DB.MY_SCHEMA.CSV_FORMAT TYPE='csv' FIELD_DELIMITER = ',' SKIP_HEADER = 1"
    );
}

#[test]
fn test_invalid_formatter_options_are_rejected() {
    let mut csv = CsvFormatter::new();
    assert!(matches!(
        csv.compression("lz4"),
        Err(OptionError::NotAllowed { option: "COMPRESSION", .. })
    ));
    assert!(csv.field_delimiter(Some(";;")).is_err());
    assert!(csv.formatter().options().is_empty());

    assert_eq!(
        CopyFormatter::named("my_csv").to_sql(RenderOptions::default()),
        "FILE_FORMAT=(format_name = my_csv)"
    );
}
