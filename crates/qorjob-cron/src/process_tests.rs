    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_process_handle() {
        let handle = ProcessHandle::new(42);
        assert_eq!(handle.pid(), 42);
    }

    #[test]
    fn test_spawn_missing_program() {
        let controller = SystemProcessController::new();
        let result = controller.spawn(&PathBuf::from("/nonexistent/qorjob-worker"), &[]);

        match result {
            Err(CronError::ProcessSpawn { program, .. }) => {
                assert!(program.contains("qorjob-worker"));
            }
            other => panic!("Expected ProcessSpawn, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_zero_pid() {
        let controller = SystemProcessController::new();
        assert!(matches!(
            controller.resolve(0),
            Err(CronError::ProcessLookup { pid: 0, .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_out_of_range_pid() {
        let controller = SystemProcessController::new();
        assert!(matches!(
            controller.resolve(u32::MAX),
            Err(CronError::ProcessLookup { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_stale_pid() {
        let controller = SystemProcessController::new();
        // Above the largest pid_max Linux allows.
        assert!(matches!(
            controller.resolve(i32::MAX as u32),
            Err(CronError::ProcessLookup { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_current_process() {
        let controller = SystemProcessController::new();
        let handle = controller.resolve(std::process::id()).unwrap();
        assert_eq!(handle.pid(), std::process::id());
    }

    #[cfg(unix)]
    #[test]
    fn test_spawn_resolve_terminate() {
        let controller = SystemProcessController::new();
        let pid = controller
            .spawn(&PathBuf::from("sleep"), &["30".to_string()])
            .unwrap();
        assert!(pid > 0);

        let handle = controller.resolve(pid).unwrap();
        assert_eq!(handle.pid(), pid);
        controller.terminate(&handle).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_terminate_invalid_pid() {
        let controller = SystemProcessController::new();
        assert!(matches!(
            controller.terminate(&ProcessHandle::new(0)),
            Err(CronError::ProcessTermination { pid: 0, .. })
        ));
    }
