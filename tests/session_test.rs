mod common;

use async_trait::async_trait;
use common::*;
use renzoku::error::{Error, Result};
use renzoku::prelude::*;
use renzoku::session::{LIBRARY_ID_NOT_NUMERIC, LIBRARY_ID_REQUIRED};

/// A source whose credentials are always refused.
struct RejectingSource;

#[async_trait]
impl LibrarySource for RejectingSource {
    async fn authenticate(&self) -> Result<()> {
        Err(Error::Authentication("bad key".to_string()))
    }

    async fn fetch_series_list(&self, _library_id: i64) -> Result<Vec<Series>> {
        Ok(Vec::new())
    }

    async fn fetch_volumes(&self, _series_id: i64) -> Result<Vec<Volume>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn test_session_state_transitions() -> Result<()> {
    let config = RenzokuConfig::default();
    let source = SnapshotSource::from_json(LIBRARY_SNAPSHOT)?;
    let mut sink = RecordingSink::default();
    let mut session = Session::new(&config, &source, ScriptedPrompter::new(&["1"], &[false]));

    assert_eq!(session.state(), &SessionState::AwaitingLibraryId);
    assert_eq!(
        session.step(&mut sink).await?,
        &SessionState::Authenticated { library_id: 1 }
    );
    assert_eq!(
        session.step(&mut sink).await?,
        &SessionState::Reporting { library_id: 1 }
    );
    assert_eq!(session.summaries().len(), 1);
    assert_eq!(session.step(&mut sink).await?, &SessionState::Done);
    // Done is terminal.
    assert_eq!(session.step(&mut sink).await?, &SessionState::Done);

    assert_eq!(sink.reports.len(), 1);
    assert!(session.into_prompter().messages.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_session_reprompts_on_invalid_library_id() -> Result<()> {
    let config = RenzokuConfig::default();
    let source = SnapshotSource::from_json(LIBRARY_SNAPSHOT)?;
    let mut sink = RecordingSink::default();
    let prompter = ScriptedPrompter::new(&["", "abc", " 1 "], &[false]);
    let mut session = Session::new(&config, &source, prompter);

    let summaries = session.run(&mut sink).await?;
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].library_id, 1);
    assert_eq!(session.state(), &SessionState::Done);

    let prompter = session.into_prompter();
    assert_eq!(
        prompter.messages,
        vec![LIBRARY_ID_REQUIRED.to_string(), LIBRARY_ID_NOT_NUMERIC.to_string()]
    );
    assert!(prompter.library_ids.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_session_survives_failed_library_run() -> Result<()> {
    let config = RenzokuConfig::default();
    let source = SnapshotSource::from_json(LIBRARY_SNAPSHOT)?;
    let mut sink = RecordingSink::default();
    let prompter = ScriptedPrompter::new(&["99", "1"], &[true, false]);
    let mut session = Session::new(&config, &source, prompter);

    let summaries = session.run(&mut sink).await?;
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].library_id, 1);
    assert_eq!(sink.headers.len(), 1);

    let prompter = session.into_prompter();
    assert_eq!(prompter.messages.len(), 1);
    assert!(prompter.messages[0].starts_with("Error: "));
    assert!(prompter.messages[0].contains("library 99"));
    Ok(())
}

#[tokio::test]
async fn test_session_reports_authentication_failure() -> Result<()> {
    let config = RenzokuConfig::default();
    let mut sink = RecordingSink::default();
    let mut session = Session::new(
        &config,
        &RejectingSource,
        ScriptedPrompter::new(&["3"], &[false]),
    );

    assert_eq!(
        session.step(&mut sink).await?,
        &SessionState::Reporting { library_id: 3 }
    );
    let summaries = session.run(&mut sink).await?;
    assert!(summaries.is_empty());
    assert!(sink.headers.is_empty());

    let prompter = session.into_prompter();
    assert_eq!(
        prompter.messages,
        vec!["Error: Authentication failed: bad key".to_string()]
    );
    Ok(())
}

#[tokio::test]
async fn test_session_audits_several_libraries() -> Result<()> {
    let config = RenzokuConfig::default();
    let source = SnapshotSource::from_json(LIBRARY_SNAPSHOT)?;
    let mut sink = RecordingSink::default();
    let prompter = ScriptedPrompter::new(&["1", "1"], &[true, false]);
    let mut session = Session::new(&config, &source, prompter);

    let summaries = session.run(&mut sink).await?;
    assert_eq!(summaries.len(), 2);
    assert_eq!(sink.headers.len(), 2);
    assert_eq!(sink.summaries.len(), 2);
    assert_eq!(sink.reports.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_session_ends_when_prompt_fails() -> Result<()> {
    let config = RenzokuConfig::default();
    let source = SnapshotSource::from_json(LIBRARY_SNAPSHOT)?;
    let mut sink = RecordingSink::default();
    let mut session = Session::new(&config, &source, ScriptedPrompter::new(&[], &[]));

    let result = session.run(&mut sink).await;
    assert!(matches!(result, Err(Error::Other(_))));
    assert_eq!(session.state(), &SessionState::AwaitingLibraryId);
    Ok(())
}
