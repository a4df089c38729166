use gifstudio_domain::{
    JobMetrics, ProbeRequest, ProcessConfig, ProcessReply, ProcessRequest, ReplyKind,
    SelectedSource,
};

use crate::{
    AddStepCommand, ApplicationError, ArtifactStore, MoveStepCommand, ProbeEvent, ProcessEvent,
    ProcessingGateway, PumpEventsCommand, RemoveStepCommand, ResultSlot, SelectSourceCommand,
    Session, SetCreatePreviewCommand, SetOutputFilenameCommand, SetOutputFormatCommand,
    SetParamCommand, SourceInspector, SubmitPipelineCommand,
};

/// The session service behind the pipeline editor. Owns all session state and
/// drives the background ports; the UI dispatches one command per user action
/// and pumps events once per frame.
pub struct StudioService {
    gateway: Box<dyn ProcessingGateway>,
    inspector: Box<dyn SourceInspector>,
    artifacts: Box<dyn ArtifactStore>,
    session: Session,
    metrics: JobMetrics,
}

impl StudioService {
    pub fn new(
        gateway: Box<dyn ProcessingGateway>,
        inspector: Box<dyn SourceInspector>,
        artifacts: Box<dyn ArtifactStore>,
    ) -> Self {
        Self {
            gateway,
            inspector,
            artifacts,
            session: Session::new(),
            metrics: JobMetrics::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn metrics(&self) -> JobMetrics {
        self.metrics
    }

    /// Records the picked file and asks the inspector for its details. The
    /// bumped token guarantees that a slow probe for a previously selected
    /// file can never overwrite this selection's details.
    pub fn select_source(
        &mut self,
        command: SelectSourceCommand,
    ) -> Result<(), ApplicationError> {
        let source = SelectedSource::new(command.path);
        let token = self.session.next_probe_token();
        self.session.details = None;
        self.session.probing = true;
        self.session.status = format!("Inspecting {}...", source.file_name);
        log::info!("selected source {} (token={token})", source.file_name);

        let request = ProbeRequest {
            token,
            path: source.path.clone(),
        };
        self.session.source = Some(source);
        match self.inspector.submit(request) {
            Ok(()) => Ok(()),
            Err(error) => {
                self.session.probing = false;
                Err(error)
            }
        }
    }

    pub fn add_step(&mut self, command: AddStepCommand) -> u64 {
        self.session.pipeline.add_step(command.kind)
    }

    pub fn remove_step(&mut self, command: RemoveStepCommand) -> Result<(), ApplicationError> {
        self.session.pipeline.remove_step(command.index)?;
        Ok(())
    }

    pub fn move_step(&mut self, command: MoveStepCommand) -> Result<(), ApplicationError> {
        self.session.pipeline.move_step(command.from, command.to)?;
        Ok(())
    }

    pub fn set_param(&mut self, command: SetParamCommand) -> Result<(), ApplicationError> {
        self.session
            .pipeline
            .set_param(command.index, &command.key, command.value)?;
        Ok(())
    }

    pub fn set_output_format(&mut self, command: SetOutputFormatCommand) {
        self.session.settings.output_format = command.format;
    }

    pub fn set_create_preview(&mut self, command: SetCreatePreviewCommand) {
        self.session.settings.create_preview = command.enabled;
    }

    pub fn set_output_filename(&mut self, command: SetOutputFilenameCommand) {
        self.session.settings.output_filename = command.name;
    }

    /// Hands the current session to the remote processor. Fails locally with
    /// [`ApplicationError::NoSourceFile`] when nothing is selected; no
    /// request is issued in that case.
    pub fn submit(&mut self, _command: SubmitPipelineCommand) -> Result<u64, ApplicationError> {
        let source = self
            .session
            .source
            .clone()
            .ok_or(ApplicationError::NoSourceFile)?;

        let sequence = self.session.next_submit_sequence();
        let config = ProcessConfig {
            pipeline: self.session.pipeline.steps().to_vec(),
            create_preview: self.session.settings.create_preview,
            output_format: self.session.settings.output_format,
            output_filename: self.session.settings.output_filename.clone(),
        };

        self.gateway.submit(ProcessRequest {
            sequence,
            source_path: source.path,
            source_name: source.file_name.clone(),
            config,
        })?;

        self.metrics.submitted += 1;
        self.session.busy = true;
        self.session.status = format!("Processing {}...", source.file_name);
        log::info!("submitted pipeline job seq={sequence} for {}", source.file_name);
        Ok(sequence)
    }

    /// Drains completed background work. Called once per UI frame.
    pub fn pump(&mut self, _command: PumpEventsCommand) -> Result<(), ApplicationError> {
        while let Some(event) = self.inspector.try_receive()? {
            self.apply_probe_event(event);
        }
        while let Some(event) = self.gateway.try_receive()? {
            self.apply_process_event(event)?;
        }
        Ok(())
    }

    fn apply_probe_event(&mut self, event: ProbeEvent) {
        match event {
            ProbeEvent::Completed(reply) => {
                if reply.token != self.session.current_probe_token() {
                    self.metrics.stale_dropped += 1;
                    log::debug!("dropping stale probe reply token={}", reply.token);
                    return;
                }
                self.session.probing = false;
                self.session.status = "Ready.".to_string();
                self.session.details = Some(reply.details);
            }
            ProbeEvent::Failed { token, message } => {
                log::warn!("file probe failed: {message}");
                if token == self.session.current_probe_token() {
                    self.session.probing = false;
                    self.session.status = "Ready.".to_string();
                }
            }
        }
    }

    fn apply_process_event(&mut self, event: ProcessEvent) -> Result<(), ApplicationError> {
        match event {
            ProcessEvent::Completed(reply) => {
                if reply.sequence < self.session.latest_submission() {
                    self.metrics.stale_dropped += 1;
                    log::debug!("dropping stale submission reply seq={}", reply.sequence);
                    return Ok(());
                }
                self.session.busy = false;
                self.metrics.completed += 1;
                match ReplyKind::classify(&reply.content_type) {
                    ReplyKind::Preview => {
                        let download_name =
                            format!("{}.gif", self.session.settings.output_filename);
                        let slot = self.store_reply(&reply, download_name)?;
                        let released = self.session.preview.replace(slot);
                        self.release(released)?;
                        self.session.status = "Preview ready.".to_string();
                    }
                    ReplyKind::Archive => {
                        let download_name =
                            format!("{}.zip", self.session.settings.output_filename);
                        let slot = self.store_reply(&reply, download_name)?;
                        let released = self.session.archive.replace(slot);
                        self.release(released)?;
                        self.session.status = "Archive ready.".to_string();
                    }
                }
            }
            ProcessEvent::Failed { sequence, message } => {
                if sequence < self.session.latest_submission() {
                    self.metrics.stale_dropped += 1;
                    return Ok(());
                }
                // Transport failures are logged only; display state stays put.
                self.metrics.failed += 1;
                self.session.busy = false;
                self.session.status = "Ready.".to_string();
                log::error!("pipeline submission seq={sequence} failed: {message}");
            }
        }
        Ok(())
    }

    fn store_reply(
        &mut self,
        reply: &ProcessReply,
        download_name: String,
    ) -> Result<ResultSlot, ApplicationError> {
        let file_name = format!("{}-{}", reply.sequence, download_name);
        let artifact = self.artifacts.store(&file_name, &reply.body)?;
        Ok(ResultSlot {
            artifact,
            sequence: reply.sequence,
            download_name,
        })
    }

    fn release(&mut self, slot: Option<ResultSlot>) -> Result<(), ApplicationError> {
        if let Some(slot) = slot {
            self.artifacts.remove(&slot.artifact)?;
        }
        Ok(())
    }
}
