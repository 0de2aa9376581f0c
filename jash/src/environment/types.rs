use jash_core_contact_impl::ContactServiceImpl;
use jash_extern_impl::upstream::UpstreamApiServiceImpl;

// API
pub type RestServer = jash_api_rest::RestServer<Contact>;

// Extern
pub type Upstream = UpstreamApiServiceImpl;

// Core
pub type Contact = ContactServiceImpl<Upstream>;

// Client
pub type ContactForm = jash_client::ContactForm<jash_client::api::HttpContactApi>;
