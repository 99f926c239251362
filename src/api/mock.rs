//! Scripted in-memory [`AssistantsApi`] implementation for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::api::assistants::{Assistant, Tool};
use crate::api::files::{File, FilePurpose};
use crate::api::messages::{Annotation, Content, Message, Role, Text};
use crate::api::runs::{
    RequiredAction, Run, RunStatus, SubmitToolOutputs, ToolCall, ToolCallFunction, Usage,
};
use crate::api::threads::Thread;
use crate::api::vector_stores::{
    FileCounts, VectorStore, VectorStoreFile, VectorStoreFileStatus, VectorStoreStatus,
};
use crate::api::AssistantsApi;
use crate::Result;

/// Calls recorded by the mock, in invocation order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    CreateThread,
    ListMessages,
    CreateMessage {
        thread_id: String,
        content: String,
        role: Role,
    },
    CreateRun {
        assistant_id: String,
        force_tool_call: bool,
    },
    GetRun {
        run_id: String,
    },
    SubmitToolOutputs {
        run_id: String,
        tool_call_id: String,
        output: String,
    },
    ListAssistants,
    CreateAssistant {
        name: String,
        vector_store_ids: Vec<String>,
    },
    DeleteAssistant(String),
    ListFiles,
    GetFile(String),
    UploadFile {
        filename: String,
    },
    DeleteFile(String),
    ListVectorStores,
    GetVectorStore(String),
    CreateVectorStore {
        name: String,
        file_ids: Vec<String>,
    },
    DeleteVectorStore(String),
    AttachFile {
        vector_store_id: String,
        file_id: String,
    },
    DeleteVectorStoreFile {
        vector_store_id: String,
        file_id: String,
    },
    ListVectorStoreFiles(String),
}

#[derive(Default)]
struct Inner {
    threads: VecDeque<Thread>,
    created_runs: VecDeque<Run>,
    run_retrievals: VecDeque<Run>,
    /// Returned by `get_run` once `run_retrievals` is drained.
    run_loop: Option<Run>,
    messages: Vec<Message>,
    assistants: Vec<Assistant>,
    files: Vec<File>,
    files_by_id: HashMap<String, File>,
    uploads: VecDeque<File>,
    vector_stores: Vec<VectorStore>,
    created_stores: VecDeque<VectorStore>,
    store_retrievals: VecDeque<VectorStore>,
    store_file_rounds: VecDeque<Vec<VectorStoreFile>>,
    calls: Vec<Call>,
}

#[derive(Default)]
pub(crate) struct MockApi {
    inner: Mutex<Inner>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_thread(&self, id: &str) {
        self.lock().threads.push_back(thread(id));
    }

    pub fn queue_created_run(&self, run: Run) {
        self.lock().created_runs.push_back(run);
    }

    pub fn queue_run(&self, run: Run) {
        self.lock().run_retrievals.push_back(run);
    }

    pub fn set_run_loop(&self, run: Run) {
        self.lock().run_loop = Some(run);
    }

    pub fn set_messages(&self, messages: Vec<Message>) {
        self.lock().messages = messages;
    }

    pub fn set_assistants(&self, assistants: Vec<Assistant>) {
        self.lock().assistants = assistants;
    }

    pub fn set_files(&self, files: Vec<File>) {
        self.lock().files = files;
    }

    pub fn insert_file(&self, file: File) {
        self.lock().files_by_id.insert(file.id.clone(), file);
    }

    pub fn queue_upload(&self, file: File) {
        self.lock().uploads.push_back(file);
    }

    pub fn set_vector_stores(&self, stores: Vec<VectorStore>) {
        self.lock().vector_stores = stores;
    }

    pub fn queue_created_store(&self, store: VectorStore) {
        self.lock().created_stores.push_back(store);
    }

    pub fn queue_store_retrieval(&self, store: VectorStore) {
        self.lock().store_retrievals.push_back(store);
    }

    pub fn queue_store_files(&self, files: Vec<VectorStoreFile>) {
        self.lock().store_file_rounds.push_back(files);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn get_run_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::GetRun { .. }))
            .count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    fn record(&self, call: Call) {
        self.lock().calls.push(call);
    }
}

impl AssistantsApi for MockApi {
    async fn create_thread(&self) -> Result<Thread> {
        self.record(Call::CreateThread);
        Ok(self.lock().threads.pop_front().expect("no scripted thread"))
    }

    async fn list_messages(&self, _thread_id: &str) -> Result<Vec<Message>> {
        self.record(Call::ListMessages);
        Ok(self.lock().messages.clone())
    }

    async fn create_message(&self, thread_id: &str, content: &str, role: Role) -> Result<Message> {
        self.record(Call::CreateMessage {
            thread_id: thread_id.to_string(),
            content: content.to_string(),
            role,
        });
        Ok(text_message("msg_user", content, Role::User, vec![]))
    }

    async fn create_run(
        &self,
        assistant_id: &str,
        _thread_id: &str,
        force_tool_call: bool,
    ) -> Result<Run> {
        self.record(Call::CreateRun {
            assistant_id: assistant_id.to_string(),
            force_tool_call,
        });
        Ok(self
            .lock()
            .created_runs
            .pop_front()
            .expect("no scripted created run"))
    }

    async fn get_run(&self, _thread_id: &str, run_id: &str) -> Result<Run> {
        self.record(Call::GetRun {
            run_id: run_id.to_string(),
        });
        let mut inner = self.lock();
        if let Some(run) = inner.run_retrievals.pop_front() {
            return Ok(run);
        }
        Ok(inner.run_loop.clone().expect("no scripted run retrieval"))
    }

    async fn submit_tool_outputs(
        &self,
        _thread_id: &str,
        run_id: &str,
        tool_call_id: &str,
        output: &str,
    ) -> Result<Run> {
        self.record(Call::SubmitToolOutputs {
            run_id: run_id.to_string(),
            tool_call_id: tool_call_id.to_string(),
            output: output.to_string(),
        });
        Ok(run(run_id, RunStatus::InProgress))
    }

    async fn list_assistants(&self) -> Result<Vec<Assistant>> {
        self.record(Call::ListAssistants);
        Ok(self.lock().assistants.clone())
    }

    async fn create_assistant(
        &self,
        name: &str,
        _description: &str,
        _instructions: &str,
        vector_store_ids: Vec<String>,
        _tools: Vec<Tool>,
    ) -> Result<Assistant> {
        self.record(Call::CreateAssistant {
            name: name.to_string(),
            vector_store_ids,
        });
        Ok(assistant("asst_new", name))
    }

    async fn delete_assistant(&self, assistant_id: &str) -> Result<()> {
        self.record(Call::DeleteAssistant(assistant_id.to_string()));
        Ok(())
    }

    async fn list_files(&self) -> Result<Vec<File>> {
        self.record(Call::ListFiles);
        Ok(self.lock().files.clone())
    }

    async fn get_file(&self, file_id: &str) -> Result<File> {
        self.record(Call::GetFile(file_id.to_string()));
        Ok(self
            .lock()
            .files_by_id
            .get(file_id)
            .cloned()
            .expect("no scripted file for id"))
    }

    async fn upload_file(&self, filename: &str, _bytes: Vec<u8>) -> Result<File> {
        self.record(Call::UploadFile {
            filename: filename.to_string(),
        });
        Ok(self.lock().uploads.pop_front().expect("no scripted upload"))
    }

    async fn delete_file(&self, file_id: &str) -> Result<()> {
        self.record(Call::DeleteFile(file_id.to_string()));
        Ok(())
    }

    async fn list_vector_stores(&self) -> Result<Vec<VectorStore>> {
        self.record(Call::ListVectorStores);
        Ok(self.lock().vector_stores.clone())
    }

    async fn get_vector_store(&self, vector_store_id: &str) -> Result<VectorStore> {
        self.record(Call::GetVectorStore(vector_store_id.to_string()));
        Ok(self
            .lock()
            .store_retrievals
            .pop_front()
            .expect("no scripted vector store retrieval"))
    }

    async fn create_vector_store(&self, name: &str, file_ids: Vec<String>) -> Result<VectorStore> {
        self.record(Call::CreateVectorStore {
            name: name.to_string(),
            file_ids,
        });
        Ok(self
            .lock()
            .created_stores
            .pop_front()
            .expect("no scripted created store"))
    }

    async fn delete_vector_store(&self, vector_store_id: &str) -> Result<()> {
        self.record(Call::DeleteVectorStore(vector_store_id.to_string()));
        Ok(())
    }

    async fn attach_file_to_vector_store(
        &self,
        vector_store_id: &str,
        file_id: &str,
    ) -> Result<VectorStoreFile> {
        self.record(Call::AttachFile {
            vector_store_id: vector_store_id.to_string(),
            file_id: file_id.to_string(),
        });
        Ok(vector_store_file(file_id, VectorStoreFileStatus::Completed))
    }

    async fn delete_vector_store_file(&self, vector_store_id: &str, file_id: &str) -> Result<()> {
        self.record(Call::DeleteVectorStoreFile {
            vector_store_id: vector_store_id.to_string(),
            file_id: file_id.to_string(),
        });
        Ok(())
    }

    async fn list_vector_store_files(
        &self,
        vector_store_id: &str,
    ) -> Result<Vec<VectorStoreFile>> {
        self.record(Call::ListVectorStoreFiles(vector_store_id.to_string()));
        Ok(self
            .lock()
            .store_file_rounds
            .pop_front()
            .expect("no scripted store file round"))
    }
}

pub(crate) fn thread(id: &str) -> Thread {
    Thread {
        id: id.to_string(),
        object: "thread".to_string(),
        created_at: 1,
        tool_resources: None,
        metadata: None,
    }
}

pub(crate) fn run(id: &str, status: RunStatus) -> Run {
    Run {
        id: id.to_string(),
        object: "thread.run".to_string(),
        created_at: 1,
        assistant_id: "asst_1".to_string(),
        thread_id: "thread_1".to_string(),
        status,
        required_action: None,
        last_error: None,
        model: Some("gpt-4o".to_string()),
        usage: None,
    }
}

pub(crate) fn completed_run(id: &str, total_tokens: u32) -> Run {
    let mut run = run(id, RunStatus::Completed);
    run.usage = Some(Usage {
        prompt_tokens: 0,
        completion_tokens: 0,
        total_tokens,
    });
    run
}

pub(crate) fn requires_action_run(
    id: &str,
    tool_call_id: &str,
    name: &str,
    arguments: &str,
) -> Run {
    let mut run = run(id, RunStatus::RequiresAction);
    run.required_action = Some(RequiredAction::SubmitToolOutputs {
        submit_tool_outputs: SubmitToolOutputs {
            tool_calls: vec![ToolCall {
                id: tool_call_id.to_string(),
                kind: "function".to_string(),
                function: ToolCallFunction {
                    name: name.to_string(),
                    arguments: arguments.to_string(),
                },
            }],
        },
    });
    run
}

pub(crate) fn text_message(
    id: &str,
    value: &str,
    role: Role,
    annotations: Vec<Annotation>,
) -> Message {
    Message {
        id: id.to_string(),
        object: "thread.message".to_string(),
        created_at: 1,
        thread_id: "thread_1".to_string(),
        role,
        content: vec![Content::Text {
            text: Text {
                value: value.to_string(),
                annotations,
            },
        }],
        assistant_id: None,
        run_id: None,
        metadata: None,
    }
}

pub(crate) fn annotation(text: &str, start_index: u32, file_id: &str) -> Annotation {
    Annotation {
        kind: "file_citation".to_string(),
        text: text.to_string(),
        start_index,
        end_index: start_index + text.len() as u32,
        file_citation: Some(crate::api::messages::FileCitation {
            file_id: file_id.to_string(),
        }),
    }
}

pub(crate) fn assistant(id: &str, name: &str) -> Assistant {
    Assistant {
        id: id.to_string(),
        object: "assistant".to_string(),
        created_at: 1,
        name: Some(name.to_string()),
        model: "gpt-4o".to_string(),
        instructions: None,
        tools: vec![],
        tool_resources: None,
        metadata: None,
    }
}

pub(crate) fn file(id: &str, filename: &str) -> File {
    File {
        id: id.to_string(),
        object: "file".to_string(),
        created_at: 1,
        bytes: 1,
        filename: filename.to_string(),
        purpose: FilePurpose::Assistants,
    }
}

pub(crate) fn vector_store(
    id: &str,
    name: &str,
    status: VectorStoreStatus,
    failed: u32,
) -> VectorStore {
    VectorStore {
        id: id.to_string(),
        object: "vector_store".to_string(),
        created_at: 1,
        name: Some(name.to_string()),
        status,
        file_counts: FileCounts {
            failed,
            ..FileCounts::default()
        },
    }
}

pub(crate) fn vector_store_file(id: &str, status: VectorStoreFileStatus) -> VectorStoreFile {
    VectorStoreFile {
        id: id.to_string(),
        object: "vector_store.file".to_string(),
        created_at: 1,
        vector_store_id: "vs_1".to_string(),
        status,
        last_error: None,
    }
}
