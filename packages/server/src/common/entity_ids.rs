//! Entity markers and their typed ID aliases.

pub use super::id::{Id, V4, V7};

pub struct BusinessUnit;
pub struct Product;
pub struct ProductType;
pub struct Category;
pub struct Attribute;
/// An attribute option; options of the `skin_concerns` attribute are concerns.
pub struct AttributeOption;
pub struct Bundle;
pub struct Profile;
pub struct ConcernSelection;
pub struct Recommendation;
pub struct KnowledgeEntry;
pub struct Guideline;
pub struct TrainingLesson;
pub struct ChatSession;
pub struct ChatMessage;
pub struct LandingPage;
pub struct MediaFile;

pub type BusinessUnitId = Id<BusinessUnit>;
pub type ProductId = Id<Product>;
pub type ProductTypeId = Id<ProductType>;
pub type CategoryId = Id<Category>;
pub type AttributeId = Id<Attribute>;
pub type OptionId = Id<AttributeOption>;
pub type BundleId = Id<Bundle>;
pub type ProfileId = Id<Profile>;
pub type ConcernSelectionId = Id<ConcernSelection>;
pub type RecommendationId = Id<Recommendation>;
pub type KnowledgeEntryId = Id<KnowledgeEntry>;
pub type GuidelineId = Id<Guideline>;
pub type TrainingLessonId = Id<TrainingLesson>;
pub type ChatSessionId = Id<ChatSession>;
pub type ChatMessageId = Id<ChatMessage>;
pub type LandingPageId = Id<LandingPage>;
pub type MediaFileId = Id<MediaFile>;
