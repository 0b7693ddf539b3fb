    use super::*;

    const SAMPLE: &str = "0 0 * * * /bin/foo\n## BEGIN QOR JOB abc # {\"JobID\":\"abc\",\"Pid\":123,\"Command\":\"\"}\n\n## END QOR JOB\n";

    #[test]
    fn test_parse_sample() {
        let table = CronTable::parse(SAMPLE);
        assert_eq!(table.lines, vec!["0 0 * * * /bin/foo"]);
        assert_eq!(table.jobs, vec![CronJob::new("abc", 123)]);
    }

    #[test]
    fn test_render_sample_is_identical() {
        let table = CronTable::parse(SAMPLE);
        assert_eq!(table.render().unwrap(), SAMPLE);
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(CronTable::parse(""), CronTable::default());
        assert_eq!(CronTable::parse("\n\n"), CronTable::default());
        assert_eq!(CronTable::default().render().unwrap(), "");
    }

    #[test]
    fn test_foreign_lines_kept_in_order() {
        let raw = "# m h dom mon dow command\n\
                   MAILTO=ops@example.com\n\
                   \n\
                   ## BEGIN QOR JOB a # {\"JobID\":\"a\",\"Pid\":0,\"Command\":\"\"}\n\
                   \n\
                   ## END QOR JOB\n\
                   */5 * * * * /usr/bin/poll\n\
                   ## BEGIN QOR JOB b # {\"JobID\":\"b\",\"Pid\":9,\"Command\":\"\"}\n\
                   \n\
                   ## END QOR JOB\n\
                   @reboot /usr/bin/warmup\n";

        let table = CronTable::parse(raw);
        assert_eq!(
            table.lines,
            vec![
                "# m h dom mon dow command",
                "MAILTO=ops@example.com",
                "",
                "*/5 * * * * /usr/bin/poll",
                "@reboot /usr/bin/warmup",
            ]
        );
        assert_eq!(table.jobs.len(), 2);

        let reparsed = CronTable::parse(&table.render().unwrap());
        assert_eq!(reparsed, table);
    }

    #[test]
    fn test_malformed_payload_drops_block() {
        let raw = "1 * * * * /bin/a\n\
                   ## BEGIN QOR JOB bad # {\"JobID\":\"bad\",\"Pid\":\n\
                   /bin/bad\n\
                   ## END QOR JOB\n\
                   2 * * * * /bin/b\n";

        let table = CronTable::parse(raw);
        assert!(table.jobs.is_empty());
        assert_eq!(table.lines, vec!["1 * * * * /bin/a", "2 * * * * /bin/b"]);
    }

    #[test]
    fn test_stray_end_marker_is_foreign() {
        let raw = "## END QOR JOB\n0 1 * * * /bin/x\n";
        let table = CronTable::parse(raw);
        assert_eq!(table.lines, vec!["## END QOR JOB", "0 1 * * * /bin/x"]);
    }

    #[test]
    fn test_unclosed_block_swallows_rest() {
        let raw = "0 1 * * * /bin/x\n\
                   ## BEGIN QOR JOB a # {\"JobID\":\"a\",\"Pid\":1,\"Command\":\"\"}\n\
                   0 2 * * * /bin/y\n";
        let table = CronTable::parse(raw);
        assert_eq!(table.lines, vec!["0 1 * * * /bin/x"]);
        assert_eq!(table.jobs.len(), 1);
    }

    #[test]
    fn test_render_skips_deleted_records() {
        let mut table = CronTable {
            lines: vec!["0 0 * * * /bin/foo".to_string()],
            jobs: vec![CronJob::new("keep", 1), CronJob::new("drop", 2)],
        };
        assert_eq!(table.mark_for_deletion("drop"), 1);

        let rendered = table.render().unwrap();
        assert!(rendered.contains("## BEGIN QOR JOB keep #"));
        assert!(!rendered.contains("drop"));
    }

    #[test]
    fn test_render_block_format() {
        let mut job = CronJob::new("j1", 42);
        job.command = "/usr/bin/true".to_string();
        let table = CronTable {
            lines: vec![],
            jobs: vec![job],
        };

        assert_eq!(
            table.render().unwrap(),
            "## BEGIN QOR JOB j1 # {\"JobID\":\"j1\",\"Pid\":42,\"Command\":\"/usr/bin/true\"}\n\
             /usr/bin/true\n\
             ## END QOR JOB\n"
        );
    }

    #[test]
    fn test_mark_for_deletion_marks_all_matches() {
        let mut table = CronTable {
            lines: vec![],
            jobs: vec![
                CronJob::new("j1", 0),
                CronJob::new("j2", 0),
                CronJob::new("j1", 5),
            ],
        };
        assert_eq!(table.mark_for_deletion("j1"), 2);
        assert_eq!(table.mark_for_deletion("j1"), 0);
        assert_eq!(table.live_jobs().count(), 1);
        assert!(table.find("j1").is_none());
        assert!(table.find("j2").is_some());
    }

    #[test]
    fn test_find_mut_skips_deleted() {
        let mut table = CronTable {
            lines: vec![],
            jobs: vec![CronJob::new("j1", 1), CronJob::new("j1", 2)],
        };
        table.jobs[0].mark_for_deletion();
        assert_eq!(table.find_mut("j1").unwrap().pid, 2);
    }

    #[test]
    fn test_decode_begin_marker() {
        let job = decode_begin_marker(
            "## BEGIN QOR JOB abc # {\"JobID\":\"abc\",\"Pid\":123,\"Command\":\"\"}",
        )
        .unwrap();
        assert_eq!(job, CronJob::new("abc", 123));
    }

    #[test]
    fn test_parse_keeps_carriage_returns_in_foreign_lines() {
        let raw = "0 0 * * * /bin/foo\r\nMAILTO=x\r\n# tail\n";
        let table = CronTable::parse(raw);

        assert_eq!(table.lines, vec!["0 0 * * * /bin/foo\r", "MAILTO=x\r", "# tail"]);
        assert_eq!(table.render().unwrap(), raw);
    }

    #[test]
    fn test_parse_crlf_job_block() {
        let raw = "MAILTO=x\r\n## BEGIN QOR JOB abc # {\"JobID\":\"abc\",\"Pid\":123,\"Command\":\"\"}\r\n\r\n## END QOR JOB\r\n";
        let table = CronTable::parse(raw);

        assert_eq!(table.lines, vec!["MAILTO=x\r"]);
        assert_eq!(table.jobs, vec![CronJob::new("abc", 123)]);
    }

    #[test]
    fn test_decode_begin_marker_without_payload() {
        let err = decode_begin_marker("## BEGIN QOR JOB abc").unwrap_err();
        assert!(matches!(err, CronError::MalformedRecord(_)));
    }

    #[test]
    fn test_decode_begin_marker_requires_delimiter() {
        // The character before `{` is part of the payload, so it must be
        // whitespace for the JSON to decode.
        let err = decode_begin_marker("## BEGIN QOR JOB abc #{\"JobID\":\"abc\"}").unwrap_err();
        assert!(matches!(err, CronError::MalformedRecord(_)));
    }

    #[test]
    fn test_decode_begin_marker_brace_in_job_id() {
        let err = decode_begin_marker(
            "## BEGIN QOR JOB a{b # {\"JobID\":\"a{b\",\"Pid\":1,\"Command\":\"\"}",
        )
        .unwrap_err();
        assert!(matches!(err, CronError::MalformedRecord(_)));
    }

    #[test]
    fn test_decode_begin_marker_non_ascii_before_brace() {
        let err = decode_begin_marker("## BEGIN QOR JOB é{").unwrap_err();
        assert!(matches!(err, CronError::MalformedRecord(_)));
    }

    #[test]
    fn test_decode_begin_marker_negative_pid() {
        let err = decode_begin_marker(
            "## BEGIN QOR JOB abc # {\"JobID\":\"abc\",\"Pid\":-1,\"Command\":\"\"}",
        )
        .unwrap_err();
        assert!(matches!(err, CronError::MalformedRecord(_)));
    }

    #[test]
    fn test_validate_job_id_accepts_plain_ids() {
        assert!(validate_job_id("nightly-report").is_ok());
        assert!(validate_job_id("job 42 #7").is_ok());
    }

    #[test]
    fn test_validate_job_id_rejects_unreadable_ids() {
        for id in ["a{b", "x\ny", "x\ry"] {
            match validate_job_id(id) {
                Err(CronError::InvalidJobId { id: rejected, .. }) => assert_eq!(rejected, id),
                other => panic!("Expected InvalidJobId for {:?}, got {:?}", id, other),
            }
        }
    }

    #[test]
    fn test_validated_id_survives_round_trip() {
        let id = "job 42 #7";
        validate_job_id(id).unwrap();

        let table = CronTable {
            lines: vec![],
            jobs: vec![CronJob::new(id, 9)],
        };
        let reparsed = CronTable::parse(&table.render().unwrap());
        assert_eq!(reparsed.jobs, vec![CronJob::new(id, 9)]);
    }

